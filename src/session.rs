//! Session Module
//!
//! The stateful core: one connection to the controller plus the flags that
//! steer every call.
//!
//! ## Call path
//! 1. Latched in error mode: report `InErrorMode`, send nothing
//! 2. Build and send the command frame
//! 3. Queueing: report `Queueing`, leave any reply unread
//! 4. Receive one frame, parse, decode, latch error mode on error codes
//!
//! ## Flags
//! ```text
//!             set_queue(true)                 set_queue(false)
//!  eom = e  ───────────────────▶ saved_eom = e ─────────────────▶ eom = saved_eom
//!                                eom = false
//!                                queueing = true
//! ```

use crate::config::Config;
use crate::error::{MecaError, Result};
use crate::network::{TcpTransport, Transport};
use crate::protocol::{
    answer_codes, codes, decode_body, encode_command, parse_response_bytes, AckFlags, Arg,
    Command, DecodedBody, Response,
};

/// Bodies meaning the controller has no error left
pub const RESET_CONFIRMATIONS: [&str; 2] =
    ["The error was reset.", "There was no error to reset."];

/// Snapshot of the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub eob: bool,
    pub eom: bool,
    pub queueing: bool,
    /// EOM preference cached by the last `set_queue(true)`
    pub saved_eom: Option<bool>,
    pub error_mode: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            eob: true,
            eom: true,
            queueing: false,
            saved_eom: None,
            error_mode: false,
        }
    }
}

impl Flags {
    pub fn ack_flags(&self) -> AckFlags {
        AckFlags::new(self.eob, self.eom)
    }
}

/// Result of a call that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Decoded reply body
    Body(DecodedBody),

    /// Sent while queueing; no reply was read
    Queueing,

    /// Not sent: the session is latched in error mode
    InErrorMode,
}

impl Outcome {
    pub fn body(&self) -> Option<&DecodedBody> {
        match self {
            Outcome::Body(body) => Some(body),
            _ => None,
        }
    }

    pub fn into_body(self) -> Option<DecodedBody> {
        match self {
            Outcome::Body(body) => Some(body),
            _ => None,
        }
    }

    pub fn is_queueing(&self) -> bool {
        matches!(self, Outcome::Queueing)
    }

    pub fn is_in_error_mode(&self) -> bool {
        matches!(self, Outcome::InErrorMode)
    }
}

/// A ready controller session
///
/// ## Concurrency
/// `Session` is single-owner (`&mut self` everywhere). Share it through
/// [`Client`](crate::Client), which runs it behind a mailbox so only one
/// exchange is ever in flight.
pub struct Session<T: Transport = TcpTransport> {
    host: String,
    port: u16,
    transport: T,
    flags: Flags,
}

impl Session<TcpTransport> {
    /// Connect to the controller described by `config`
    ///
    /// 1. TCP connect bounded by the connect timeout
    /// 2. Read the greeting bounded by the handshake timeout
    /// 3. Switch to the steady-state timeouts
    pub fn connect(config: &Config) -> Result<Self> {
        if config.host.is_empty() {
            return Err(MecaError::Config("host is empty".to_string()));
        }

        tracing::debug!("Connecting to {}:{}", config.host, config.port);

        let mut transport =
            TcpTransport::connect(&config.host, config.port, config.connect_timeout())?;
        transport.set_write_timeout(config.write_timeout())?;
        transport.set_recv_timeout(config.handshake_timeout())?;

        let mut session = Self::handshake(transport, &config.host, config.port)?;
        session.transport.set_recv_timeout(config.read_timeout())?;

        Ok(session)
    }
}

impl<T: Transport> Session<T> {
    /// Read the greeting frame from an open transport
    ///
    /// Only `3000` yields a session. `3001` means another client holds
    /// the controller; anything else is unexpected. Both are fatal.
    pub fn handshake(mut transport: T, host: &str, port: u16) -> Result<Self> {
        let frame = transport.recv()?;
        let greeting = parse_response_bytes(&frame)?;

        match greeting.code {
            codes::CONNECTED => {
                tracing::info!("Connected to {}:{}: {}", host, port, greeting.body);
                Ok(Self {
                    host: host.to_string(),
                    port,
                    transport,
                    flags: Flags::default(),
                })
            }
            codes::ALREADY_CONNECTED => {
                tracing::warn!("{}:{} refused the session: {}", host, port, greeting.body);
                Err(MecaError::AlreadyConnected(greeting.body))
            }
            code => Err(MecaError::UnexpectedHandshake {
                code,
                body: greeting.body,
            }),
        }
    }

    // =========================================================================
    // Call path
    // =========================================================================

    /// Send `name(args)` and, unless queueing, wait for its reply
    pub fn run(&mut self, name: &str, args: &[Arg]) -> Result<Outcome> {
        self.execute(&Command::with_args(name, args.iter().cloned()))
    }

    /// Send a prepared command, see [`run`](Self::run)
    pub fn execute(&mut self, command: &Command) -> Result<Outcome> {
        if self.flags.error_mode {
            tracing::debug!("Not sending {}: session is in error mode", command);
            return Ok(Outcome::InErrorMode);
        }

        tracing::trace!("-> {}", command);
        self.transport.send(&encode_command(command))?;

        if self.flags.queueing {
            return Ok(Outcome::Queueing);
        }

        let response = self.receive()?;
        let body = decode_body(response.code, &response.body)?;

        if response.is_error() {
            tracing::warn!(
                "Controller reported [{:04}][{}], entering error mode",
                response.code,
                response.body
            );
            self.flags.error_mode = true;
        }

        Ok(Outcome::Body(body))
    }

    fn receive(&mut self) -> Result<Response> {
        let frame = self.transport.recv()?;
        let response = parse_response_bytes(&frame)?;
        tracing::trace!("<- [{:04}][{}]", response.code, response.body);
        Ok(response)
    }

    // =========================================================================
    // Flag transitions
    // =========================================================================

    /// Enable or disable end-of-block acks
    pub fn set_eob(&mut self, enabled: bool) -> Result<Outcome> {
        self.flags.eob = enabled;
        self.run("SetEOB", &[enabled.into()])
    }

    /// Enable or disable end-of-movement acks
    pub fn set_eom(&mut self, enabled: bool) -> Result<Outcome> {
        self.flags.eom = enabled;
        self.run("SetEOM", &[enabled.into()])
    }

    /// Enter or leave queueing mode; returns the resulting queueing flag
    ///
    /// Entering caches the EOM preference and turns EOM off (the `SetEOM`
    /// reply is not awaited). Leaving restores the cached preference.
    /// Replies that arrived while queueing stay in the receive buffer and
    /// are consumed, oldest first, by later calls.
    pub fn set_queue(&mut self, enabled: bool) -> Result<bool> {
        if enabled {
            self.flags.saved_eom = Some(self.flags.eom);
            self.flags.queueing = true;
            self.set_eom(false)?;
        } else {
            self.flags.queueing = false;
            let restore = self.flags.saved_eom.unwrap_or(self.flags.eom);
            self.set_eom(restore)?;
        }
        Ok(self.flags.queueing)
    }

    /// Ask the controller to clear its error and update error mode
    ///
    /// This goes through [`execute`](Self::execute), so once error mode is
    /// latched the reset is never transmitted and the latch stays set. It
    /// only clears anything when called before the latch engages.
    pub fn reset_error(&mut self) -> Result<Outcome> {
        let outcome = self.run("ResetError", &[])?;

        let cleared = matches!(
            outcome.body(),
            Some(DecodedBody::Text(text)) if RESET_CONFIRMATIONS.contains(&text.as_str())
        );
        self.flags.error_mode = !cleared;

        Ok(outcome)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_in_error_mode(&self) -> bool {
        self.flags.error_mode
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Codes a reply to `command` may carry under the current flags
    pub fn answer_codes(&self, command: &str) -> Vec<u16> {
        answer_codes(command, self.flags.ack_flags())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Close the connection
    pub fn close(&mut self) -> Result<()> {
        tracing::debug!("Closing session to {}:{}", self.host, self.port);
        self.transport.shutdown()
    }
}
