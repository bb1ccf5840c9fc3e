//! Configuration for rosapi
//!
//! Centralized connection settings with sensible defaults.

use std::time::Duration;

use crate::error::{Result, RosError};

/// Default plain-text API port
pub const DEFAULT_PORT: u16 = 8728;

/// Main configuration for a router session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Router Address
    // -------------------------------------------------------------------------
    /// Router host name or IP address
    pub host: String,

    /// API port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------
    /// Login user name
    pub username: String,

    /// Login password
    pub password: String,

    /// Which login exchange to perform
    pub login_flow: LoginFlow,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// TCP connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Per-read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Per-write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Largest word accepted from the router (bytes)
    pub max_word_size: u32,
}

/// Login exchange used by [`Session::authenticate`](crate::Session::authenticate)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFlow {
    /// Bare `/login`, then `/login` carrying name and password
    TwoStep,

    /// A single `/login` carrying name and password
    Plain,

    /// Credentials first; a second step only if the router answers with a challenge
    Auto,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            username: "admin".to_string(),
            password: String::new(),
            login_flow: LoginFlow::TwoStep,
            connect_timeout_ms: 5000,
            read_timeout_ms: 10_000,
            write_timeout_ms: 5000,
            max_word_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Check the settings before opening a connection
    ///
    /// Every blocking operation must be bounded, so zero timeouts are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(RosError::Config("host must not be empty".to_string()));
        }
        if self.connect_timeout_ms == 0 || self.read_timeout_ms == 0 || self.write_timeout_ms == 0 {
            return Err(RosError::Config("timeouts must be greater than zero".to_string()));
        }
        if self.max_word_size == 0 {
            return Err(RosError::Config("max_word_size must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the router host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the API port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the login user name
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Set the login password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the login flow
    pub fn login_flow(mut self, flow: LoginFlow) -> Self {
        self.config.login_flow = flow;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the largest accepted word (in bytes)
    pub fn max_word_size(mut self, bytes: u32) -> Self {
        self.config.max_word_size = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
