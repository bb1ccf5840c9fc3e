//! # rosapi
//!
//! A blocking client for the RouterOS API protocol with:
//! - Self-describing variable-length word framing
//! - Multi-sentence reply assembly (one map per result row)
//! - Bare and credential-carrying login flows
//! - Tagged errors separating broken transports from rejected commands
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                             │
//! │        (connect / authenticate / execute / disconnect)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Sentence   │          │    Reply    │
//!   │  Assembler  │          │   Parser    │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ Word Stream │
//!   └──────┬──────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │   Length    │
//!   │    Codec    │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use rosapi::{Config, Session};
//!
//! let config = Config::builder()
//!     .host("192.168.88.1")
//!     .username("admin")
//!     .password("secret")
//!     .build();
//!
//! let mut session = Session::open(config)?;
//! for row in session.query("/system/resource/print", &[])? {
//!     println!("{:?}", row.get("uptime"));
//! }
//! session.disconnect();
//! # Ok::<(), rosapi::RosError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, RosError};
pub use config::{Config, LoginFlow};
pub use protocol::{Attributes, Command, Outcome, RawAttributes, Reply, Trap};
pub use session::{Session, SessionState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rosapi
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
