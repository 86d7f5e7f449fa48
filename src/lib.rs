//! # meca-client
//!
//! Session client for Meca500-style robot controllers:
//! - Null-terminated ASCII command frames over one TCP connection
//! - Fixed-position reply parsing and code-driven body decoding
//! - EOB/EOM acknowledgement, queueing and error-latch session flags
//! - Single-mediator concurrency: one exchange in flight at a time
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Client (cloneable, any thread)                │
//! │                + robot command surface                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ mailbox
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Session (mediator thread)                      │
//! │      flags: eob, eom, queueing, saved_eom, error_mode       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │  Transport  │
//!   │ build/parse │          │ TCP, \0     │
//!   │ decode      │          │ framing     │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use meca_client::{Client, Config};
//!
//! # fn main() -> meca_client::Result<()> {
//! let config = Config::builder().host("192.168.0.100").build();
//! let robot = Client::connect(&config)?;
//! robot.activate_robot()?;
//! robot.home()?;
//! let joints = robot.get_joints()?;
//! println!("{:?}", joints);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod client;
pub mod mock;
pub mod network;
pub mod protocol;
pub mod robot;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::Client;
pub use config::{Config, ServerConfig};
pub use error::{MecaError, Result};
pub use protocol::{answer_codes, build, decode_body, parse_response, Arg, Command, DecodedBody};
pub use session::{Flags, Outcome, Session};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of meca-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
