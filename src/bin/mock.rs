//! Mock Controller Binary
//!
//! Serves the simulated controller over TCP for local development.

use clap::Parser;
use meca_client::network::Server;
use meca_client::ServerConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Mock Meca500 controller
#[derive(Parser, Debug)]
#[command(name = "meca-mock")]
#[command(about = "Simulated Meca500 controller speaking the ASCII protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:10000")]
    listen: String,

    /// Clients served at once (the real controller allows one)
    #[arg(long, default_value = "1")]
    max_sessions: usize,

    /// Drop an idle client after this many milliseconds (0 = never)
    #[arg(long, default_value = "0")]
    idle_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meca_client=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("meca-mock v{}", meca_client::VERSION);

    let config = ServerConfig {
        listen_addr: args.listen,
        max_sessions: args.max_sessions,
        read_timeout_ms: args.idle_timeout_ms,
        ..ServerConfig::default()
    };

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
