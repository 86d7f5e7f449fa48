//! Network Module
//!
//! TCP plumbing on both ends of the protocol.
//!
//! ## Architecture
//! - `Transport` / `TcpTransport`: the client side, one frame in, one out
//! - `Server` / `Connection`: the mock controller, one session at a time

mod connection;
mod server;
mod transport;

pub use connection::{Connection, BUSY_GREETING, GREETING};
pub use server::{Server, ServerHandle};
pub use transport::{TcpTransport, Transport};
