//! Transport
//!
//! Byte-stream plumbing under the session: send one frame, receive one
//! `\0`-delimited frame.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{MecaError, Result};
use crate::protocol::{read_frame, write_frame};

/// A reliable, frame-aware byte stream
pub trait Transport: Send {
    /// Send one frame (terminator included)
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Receive one frame with its terminator stripped
    fn recv(&mut self) -> Result<Vec<u8>>;

    /// Bound the next receives; `None` blocks indefinitely
    fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<()>;

    /// Close the stream
    fn shutdown(&mut self) -> Result<()>;
}

/// TCP transport to a controller
pub struct TcpTransport {
    /// TCP stream reader (buffered so frames can be split on `\0`)
    reader: BufReader<TcpStream>,

    /// TCP stream writer
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    /// Connect to `host:port`, trying each resolved address in turn
    pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<Self> {
        let mut last_err = None;

        for addr in (host, port).to_socket_addrs()? {
            let attempt = match timeout {
                Some(t) => TcpStream::connect_timeout(&addr, t),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Self::from_stream(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) => MecaError::Io(e),
            None => MecaError::Network(format!("{}:{} resolved to no addresses", host, port)),
        })
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Commands are tiny; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
        })
    }

    /// Set the send timeout
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        write_frame(&mut self.writer, frame)
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        read_frame(&mut self.reader)
    }

    fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already gone
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
