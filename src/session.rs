//! Session Module
//!
//! Owns one router connection from connect to disconnect.
//!
//! ## Responsibilities
//! - Open the TCP transport with bounded timeouts
//! - Run the login exchange
//! - Issue commands and return parsed replies
//! - Tear the connection down on any transport or framing failure

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::{Config, LoginFlow};
use crate::error::{Result, RosError};
use crate::network::{read_batch, WordStream};
use crate::protocol::{parse_batch, Attributes, Command, Outcome, Reply};

/// Lifecycle of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Connecting,
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Closed => "closed",
            SessionState::Connecting => "connecting",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
        }
    }
}

/// A single-owner connection to one router
///
/// ## Concurrency Model: Half-Duplex
///
/// - Every command takes `&mut self` and returns only after its whole reply
///   batch has been read, so exactly one command is ever in flight
/// - Sharing a session between callers needs external serialization
/// - Closing the transport is the only way to cancel
///
/// ## Failure Handling
///
/// - A `!trap` reply is returned as [`Outcome::Trap`]; the session stays usable
/// - Transport, framing, `!fatal`, and login failures close the session
pub struct Session<T: Read + Write = TcpStream> {
    /// Session configuration
    config: Config,

    /// Open transport, `None` while closed
    stream: Option<WordStream<T>>,

    /// Current lifecycle state
    state: SessionState,
}

impl Session<TcpStream> {
    /// Create a closed session
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stream: None,
            state: SessionState::Closed,
        }
    }

    /// Connect and log in using the address and credentials in `config`
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let host = config.host.clone();
        let port = config.port;
        let timeout = config.connect_timeout();
        let username = config.username.clone();
        let password = config.password.clone();

        let mut session = Self::new(config);
        session.connect(&host, port, timeout)?;
        session.authenticate(&username, &password)?;
        Ok(session)
    }

    /// Open the transport
    ///
    /// On failure the session stays `Closed`.
    pub fn connect(&mut self, host: &str, port: u16, timeout: Duration) -> Result<()> {
        self.require(SessionState::Closed)?;
        if timeout.is_zero() {
            return Err(RosError::Config("connect timeout must be greater than zero".to_string()));
        }

        self.state = SessionState::Connecting;
        tracing::debug!("Connecting to {}:{}", host, port);

        match self.open_socket(host, port, timeout) {
            Ok(stream) => {
                tracing::debug!("Connected to {}", stream.peer_addr());
                self.stream = Some(stream);
                self.state = SessionState::Unauthenticated;
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Connection to {}:{} failed: {}", host, port, e);
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    /// Try every resolved address in turn
    fn open_socket(&self, host: &str, port: u16, timeout: Duration) -> Result<WordStream<TcpStream>> {
        let addrs = (host, port).to_socket_addrs().map_err(|e| {
            RosError::Connection(format!("Failed to resolve {}:{}: {}", host, port, e))
        })?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(socket) => {
                    socket.set_nodelay(true)?;
                    let stream = WordStream::new(socket, self.config.max_word_size);
                    stream.set_timeouts(self.config.read_timeout(), self.config.write_timeout())?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(RosError::Connection(match last_error {
            Some(e) => format!("Failed to connect to {}:{}: {}", host, port, e),
            None => format!("No addresses found for {}:{}", host, port),
        }))
    }
}

impl<T: Read + Write> Session<T> {
    /// Wrap an already connected transport; the session starts `Unauthenticated`
    pub fn with_transport(config: Config, transport: T) -> Self {
        let stream = WordStream::new(transport, config.max_word_size);
        Self {
            config,
            stream: Some(stream),
            state: SessionState::Unauthenticated,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Log in with the configured [`LoginFlow`]
    ///
    /// - A trap on the bare `/login` step means the router speaks a protocol
    ///   generation this flow does not support (`Protocol` error)
    /// - A trap on the credentials step is an `Authentication` error
    ///
    /// Any failure closes the session.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        self.require(SessionState::Unauthenticated)?;
        tracing::debug!("Logging in as {} ({:?})", username, self.config.login_flow);

        let result = match self.config.login_flow {
            LoginFlow::TwoStep => self.login_two_step(username, password),
            LoginFlow::Plain => self.login_with_credentials(username, password).map(|_| ()),
            LoginFlow::Auto => self.login_auto(username, password),
        };

        match result {
            Ok(()) => {
                self.state = SessionState::Authenticated;
                tracing::debug!("Logged in as {}", username);
                Ok(())
            }
            Err(e) => {
                self.teardown(&e);
                Err(e)
            }
        }
    }

    fn login_two_step(&mut self, username: &str, password: &str) -> Result<()> {
        if let Outcome::Trap(trap) = self.exchange(&Command::new("/login"))? {
            return Err(RosError::Protocol(format!(
                "Router rejected bare login, unsupported protocol version: {}",
                trap.message
            )));
        }
        self.login_with_credentials(username, password)?;
        Ok(())
    }

    /// Credentials first; a `=ret=` challenge in the answer means the router
    /// expects the older two-sentence exchange
    fn login_auto(&mut self, username: &str, password: &str) -> Result<()> {
        let reply = self.login_with_credentials(username, password)?;
        if reply.ret().is_some() {
            tracing::debug!("Router answered login with a challenge, sending second step");
            let second = self.login_with_credentials(username, password)?;
            if second.ret().is_some() {
                return Err(RosError::Authentication(
                    "router still answers login with a challenge".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn login_with_credentials(&mut self, username: &str, password: &str) -> Result<Reply> {
        let command = Command::new("/login")
            .attribute("name", username)
            .attribute("password", password);

        match self.exchange(&command)? {
            Outcome::Done(reply) => Ok(reply),
            Outcome::Trap(trap) if trap.message.is_empty() => {
                Err(RosError::Authentication("credentials rejected".to_string()))
            }
            Outcome::Trap(trap) => Err(RosError::Authentication(trap.message)),
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Send `path` with `=key=value` attributes and `?key=value` filters
    ///
    /// Fails with `InvalidState` before any I/O unless authenticated.
    pub fn execute(
        &mut self,
        path: &str,
        attributes: &[(&str, &str)],
        filters: &[(&str, &str)],
    ) -> Result<Outcome> {
        self.execute_raw(&Command::with_params(path, attributes, filters))
    }

    /// Send a prebuilt command
    ///
    /// A path that does not start with `/` is rejected before any I/O.
    pub fn execute_raw(&mut self, command: &Command) -> Result<Outcome> {
        self.require(SessionState::Authenticated)?;
        command.validate()?;
        tracing::debug!("Executing {}", command.path());

        let outcome = self.exchange(command)?;
        if let Outcome::Trap(trap) = &outcome {
            tracing::debug!("{} trapped: {}", command.path(), trap.message);
        }
        Ok(outcome)
    }

    /// Run a print-style command and return its rows
    ///
    /// A trap becomes [`RosError::Operation`].
    pub fn query(&mut self, path: &str, filters: &[(&str, &str)]) -> Result<Vec<Attributes>> {
        self.execute(path, &[], filters)?.into_rows()
    }

    /// Find the `.id` of the first item in `menu` whose `key` equals `value`
    pub fn lookup_id(&mut self, menu: &str, key: &str, value: &str) -> Result<Option<String>> {
        let command = Command::new(format!("{}/print", menu.trim_end_matches('/')))
            .proplist(&[".id"])
            .filter(key, value);

        let rows = self.execute_raw(&command)?.into_rows()?;
        Ok(rows.into_iter().find_map(|mut row| row.remove(".id")))
    }

    /// One command/reply round trip; fatal errors close the session
    fn exchange(&mut self, command: &Command) -> Result<Outcome> {
        let result = self.round_trip(command);
        if let Err(e) = &result {
            if e.is_fatal() {
                self.teardown(e);
            }
        }
        result
    }

    fn round_trip(&mut self, command: &Command) -> Result<Outcome> {
        let actual = self.state.as_str();
        let stream = self.stream.as_mut().ok_or(RosError::InvalidState {
            expected: "connected",
            actual,
        })?;

        tracing::trace!(">>> {}", command.path());
        stream.send_sentence(command.words())?;

        let batch = read_batch(stream)?;
        parse_batch(&batch)
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Close the transport; calling it again is a no-op
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Disconnected");
        }
        self.state = SessionState::Closed;
    }

    fn teardown(&mut self, reason: &RosError) {
        tracing::debug!("Closing session: {}", reason);
        self.stream = None;
        self.state = SessionState::Closed;
    }

    fn require(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RosError::InvalidState {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            })
        }
    }

    /// Borrow the transport, if still open
    pub fn get_ref(&self) -> Option<&T> {
        self.stream.as_ref().map(WordStream::get_ref)
    }

    /// Mutably borrow the transport, if still open
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.stream.as_mut().map(WordStream::get_mut)
    }
}
