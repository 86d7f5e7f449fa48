//! Shared test helpers

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::time::Duration;

use meca_client::network::Transport;
use meca_client::{MecaError, Result, Session};
use parking_lot::Mutex;

/// Transport double: records every frame sent and replays scripted replies
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    sent: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<VecDeque<Vec<u8>>>>,
    recv_timeouts: Arc<Mutex<Vec<Option<Duration>>>>,
    closed: Arc<Mutex<bool>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply frame (as delivered by the transport, no terminator)
    pub fn reply(&self, code: u16, body: &str) -> &Self {
        self.reply_raw(&format!("[{:04}][{}]", code, body))
    }

    pub fn reply_raw(&self, frame: &str) -> &Self {
        self.replies.lock().push_back(frame.as_bytes().to_vec());
        self
    }

    /// Frames sent so far, terminators included
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.lock().len()
    }

    /// Receive timeouts applied so far, oldest first
    pub fn recv_timeouts(&self) -> Vec<Option<Duration>> {
        self.recv_timeouts.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.sent
            .lock()
            .push(String::from_utf8_lossy(frame).into_owned());
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        self.replies.lock().pop_front().ok_or_else(|| {
            MecaError::Io(Error::new(ErrorKind::UnexpectedEof, "no scripted reply"))
        })
    }

    // Scripted replies never block; the timeout is only recorded
    fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.recv_timeouts.lock().push(timeout);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        *self.closed.lock() = true;
        Ok(())
    }
}

/// A ready session over a scripted transport, plus a handle to inspect it
pub fn scripted_session() -> (ScriptedTransport, Session<ScriptedTransport>) {
    let wire = ScriptedTransport::new();
    wire.reply(3000, "Connected to Meca500 R3 v8.3.0.");
    let session = Session::handshake(wire.clone(), "robot.test", 10000).unwrap();
    (wire, session)
}
