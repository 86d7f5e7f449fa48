//! Error types for meca-client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using MecaError
pub type Result<T> = std::result::Result<T, MecaError>;

/// Unified error type for meca-client operations
#[derive(Debug, Error)]
pub enum MecaError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    /// The controller refused the session because another client holds it
    #[error("Another session is already connected: {0}")]
    AlreadyConnected(String),

    #[error("Unexpected handshake reply [{code:04}][{body}]")]
    UnexpectedHandshake { code: u16, body: String },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Cannot decode body of code {code}: segment {segment:?} is not numeric")]
    Decode { code: u16, segment: String },

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    /// The session mediator is gone (disconnected or its thread exited)
    #[error("Session closed")]
    SessionClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
