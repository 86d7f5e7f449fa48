//! Client Module
//!
//! Thread-safe handle to a [`Session`].
//!
//! ## Concurrency Model: Single Mediator
//!
//! The protocol has no request identifiers, so two exchanges must never
//! overlap. `Client` owns no state itself: every call is posted to a
//! mailbox drained by one thread that owns the session and runs each
//! request to completion before taking the next.
//!
//! ```text
//!  caller ─┐
//!  caller ─┼─▶ mailbox ─▶ mediator thread ─▶ Session ─▶ socket
//!  caller ─┘      ▲                            │
//!                 └──────── reply slot ◀───────┘
//! ```

use std::thread;

use crossbeam::channel::{self, Receiver, Sender};

use crate::config::Config;
use crate::error::{MecaError, Result};
use crate::network::Transport;
use crate::protocol::{Arg, Command};
use crate::session::{Flags, Outcome, Session};

/// A request to the mediator, carrying its own reply slot
enum Request {
    Execute {
        command: Command,
        reply: Sender<Result<Outcome>>,
    },
    SetEob {
        enabled: bool,
        reply: Sender<Result<Outcome>>,
    },
    SetEom {
        enabled: bool,
        reply: Sender<Result<Outcome>>,
    },
    SetQueue {
        enabled: bool,
        reply: Sender<Result<bool>>,
    },
    ResetError {
        reply: Sender<Result<Outcome>>,
    },
    Flags {
        reply: Sender<Flags>,
    },
    Disconnect {
        reply: Sender<Result<()>>,
    },
}

/// Cloneable handle to a session running on its own thread
#[derive(Clone)]
pub struct Client {
    mailbox: Sender<Request>,
}

impl Client {
    /// Connect using `config` and start the mediator
    pub fn connect(config: &Config) -> Result<Self> {
        let session = Session::connect(config)?;
        Self::spawn(session)
    }

    /// Start a mediator thread that owns `session`
    pub fn spawn<T: Transport + 'static>(session: Session<T>) -> Result<Self> {
        let (mailbox, requests) = channel::unbounded();

        thread::Builder::new()
            .name("meca-session".to_string())
            .spawn(move || mediate(session, requests))?;

        Ok(Self { mailbox })
    }

    /// Post a request and block until the mediator answers it
    fn call<R>(&self, request: impl FnOnce(Sender<R>) -> Request) -> Result<R> {
        let (reply, slot) = channel::bounded(1);
        self.mailbox
            .send(request(reply))
            .map_err(|_| MecaError::SessionClosed)?;
        slot.recv().map_err(|_| MecaError::SessionClosed)
    }

    // =========================================================================
    // Core operations
    // =========================================================================

    /// Send `name(args)`; see [`Session::run`]
    pub fn run(&self, name: &str, args: &[Arg]) -> Result<Outcome> {
        self.execute(Command::with_args(name, args.iter().cloned()))
    }

    /// Send a prepared command
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        self.call(|reply| Request::Execute { command, reply })?
    }

    pub fn set_eob(&self, enabled: bool) -> Result<Outcome> {
        self.call(|reply| Request::SetEob { enabled, reply })?
    }

    pub fn set_eom(&self, enabled: bool) -> Result<Outcome> {
        self.call(|reply| Request::SetEom { enabled, reply })?
    }

    /// Enter or leave queueing mode; returns the resulting queueing flag
    pub fn set_queue(&self, enabled: bool) -> Result<bool> {
        self.call(|reply| Request::SetQueue { enabled, reply })?
    }

    pub fn reset_error(&self) -> Result<Outcome> {
        self.call(|reply| Request::ResetError { reply })?
    }

    pub fn is_in_error_mode(&self) -> Result<bool> {
        Ok(self.flags()?.error_mode)
    }

    pub fn flags(&self) -> Result<Flags> {
        self.call(|reply| Request::Flags { reply })
    }

    /// Close the connection and stop the mediator
    ///
    /// Every clone of this handle fails with `SessionClosed` afterwards.
    pub fn disconnect(&self) -> Result<()> {
        self.call(|reply| Request::Disconnect { reply })?
    }
}

/// Mediator loop: one request at a time until disconnect or all handles drop
fn mediate<T: Transport>(mut session: Session<T>, requests: Receiver<Request>) {
    tracing::debug!("Session mediator started for {}:{}", session.host(), session.port());

    // A caller that gave up waiting is not an error for the session
    while let Ok(request) = requests.recv() {
        match request {
            Request::Execute { command, reply } => {
                let _ = reply.send(session.execute(&command));
            }
            Request::SetEob { enabled, reply } => {
                let _ = reply.send(session.set_eob(enabled));
            }
            Request::SetEom { enabled, reply } => {
                let _ = reply.send(session.set_eom(enabled));
            }
            Request::SetQueue { enabled, reply } => {
                let _ = reply.send(session.set_queue(enabled));
            }
            Request::ResetError { reply } => {
                let _ = reply.send(session.reset_error());
            }
            Request::Flags { reply } => {
                let _ = reply.send(session.flags());
            }
            Request::Disconnect { reply } => {
                let _ = reply.send(session.close());
                break;
            }
        }
    }

    tracing::debug!("Session mediator stopped");
}
