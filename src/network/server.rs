//! TCP Server
//!
//! Accepts connections for the mock controller. Like the real device it
//! serves one session at a time by default (`max_sessions`); extra clients
//! get the busy greeting and are closed.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::connection::{reject_busy, Connection};
use crate::config::ServerConfig;
use crate::error::{MecaError, Result};
use crate::mock::MockRobot;

/// Pause between polls of the non-blocking listener
const ACCEPT_POLL: Duration = Duration::from_millis(10);

/// TCP server for the mock controller
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,

    /// Controller state, shared across successive sessions
    robot: Arc<Mutex<MockRobot>>,

    /// Clients currently being served
    active: Arc<AtomicUsize>,

    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: ServerConfig) -> Result<Self> {
        if config.max_sessions == 0 {
            return Err(MecaError::Config("max_sessions must be at least 1".to_string()));
        }

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            listener,
            robot: Arc::new(Mutex::new(MockRobot::new())),
            active: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared handle to the simulated controller
    pub fn robot(&self) -> Arc<Mutex<MockRobot>> {
        Arc::clone(&self.robot)
    }

    /// Accept connections until shutdown is signalled (blocking)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Mock controller listening on {}", self.local_addr()?);

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::debug!("Accepted {}", addr);
                    if let Err(e) = self.dispatch(stream) {
                        tracing::warn!("Failed to serve {}: {}", addr, e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(e) => return Err(MecaError::Io(e)),
            }
        }

        tracing::info!("Mock controller stopped");
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Run the accept loop on a background thread
    pub fn spawn(self) -> Result<ServerHandle> {
        let addr = self.local_addr()?;
        let robot = self.robot();
        let shutdown = Arc::clone(&self.shutdown);

        let thread = thread::Builder::new()
            .name("meca-mock-accept".to_string())
            .spawn(move || self.run())?;

        Ok(ServerHandle {
            addr,
            robot,
            shutdown,
            thread: Some(thread),
        })
    }

    fn dispatch(&self, stream: TcpStream) -> Result<()> {
        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;

        let limit = self.config.max_sessions;
        let claimed = self
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < limit).then_some(n + 1));
        if claimed.is_err() {
            tracing::debug!("All {} session(s) busy, turning client away", limit);
            return reject_busy(stream);
        }

        if let Err(e) = self.serve(stream) {
            self.active.fetch_sub(1, Ordering::AcqRel);
            return Err(e);
        }

        Ok(())
    }

    /// Start a connection thread for a client holding a claimed slot
    fn serve(&self, stream: TcpStream) -> Result<()> {
        let mut connection = Connection::new(stream, self.robot())?;
        connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;

        let active = Arc::clone(&self.active);
        thread::Builder::new()
            .name("meca-mock-conn".to_string())
            .spawn(move || {
                if let Err(e) = connection.handle() {
                    tracing::warn!("Connection {} ended with error: {}", connection.peer_addr(), e);
                }
                active.fetch_sub(1, Ordering::AcqRel);
            })?;

        Ok(())
    }
}

/// Handle to a server running on a background thread
///
/// Dropping the handle stops the accept loop.
pub struct ServerHandle {
    addr: SocketAddr,
    robot: Arc<Mutex<MockRobot>>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn robot(&self) -> Arc<Mutex<MockRobot>> {
        Arc::clone(&self.robot)
    }

    /// Stop accepting and wait for the accept loop to exit
    pub fn stop(mut self) -> Result<()> {
        self.stop_inner()
    }

    fn stop_inner(&mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::Relaxed);
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| MecaError::Network("accept thread panicked".to_string()))?,
            None => Ok(()),
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop_inner();
    }
}
