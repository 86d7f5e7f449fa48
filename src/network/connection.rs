//! Connection Handler
//!
//! Serves one client of the mock controller.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{MecaError, Result};
use crate::mock::MockRobot;
use crate::protocol::{codes, encode_reply, read_frame, write_frame, Response};

/// Greeting body sent to the session holder
pub const GREETING: &str = "Connected to Meca500 mock.";

/// Greeting body sent to a client turned away
pub const BUSY_GREETING: &str = "Another user is already connected, closing connection.";

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for frame splitting)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared simulated controller
    robot: Arc<Mutex<MockRobot>>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, robot: Arc<Mutex<MockRobot>>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            robot,
            peer_addr,
        })
    }

    /// Configure connection timeouts (milliseconds, 0 = none)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Greet, then answer commands until the client disconnects
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        self.send(&Response::new(codes::CONNECTED, GREETING))?;

        loop {
            let frame = match read_frame(&mut self.reader) {
                Ok(frame) => frame,
                Err(MecaError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(MecaError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            let text = String::from_utf8_lossy(&frame);
            tracing::trace!("Received command from {}: {}", self.peer_addr, text);

            let replies = self.robot.lock().respond(&text);

            for reply in &replies {
                if let Err(e) = self.send(reply) {
                    if let MecaError::Io(ref io_err) = e {
                        if is_disconnect(io_err.kind()) {
                            tracing::debug!(
                                "Client {} disconnected before reply could be sent: {}",
                                self.peer_addr,
                                e
                            );
                            return Ok(());
                        }
                    }
                    tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            }
        }
    }

    /// Send one reply frame
    fn send(&mut self, reply: &Response) -> Result<()> {
        write_frame(&mut self.writer, &encode_reply(reply.code, &reply.body))
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Turn away a client while another one holds the session
pub fn reject_busy(stream: TcpStream) -> Result<()> {
    let mut writer = BufWriter::new(stream);
    write_frame(
        &mut writer,
        &encode_reply(codes::ALREADY_CONNECTED, BUSY_GREETING),
    )
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
