//! meca-client CLI
//!
//! Sends one command to a controller and prints the decoded reply.

use clap::Parser;
use meca_client::{Arg, Client, Config, DecodedBody, Outcome};
use tracing_subscriber::{fmt, EnvFilter};

/// meca-client CLI
#[derive(Parser, Debug)]
#[command(name = "meca-cli")]
#[command(about = "Send a single command to a Meca500 controller")]
#[command(version)]
struct Args {
    /// Controller host
    #[arg(long, default_value = meca_client::config::DEFAULT_HOST)]
    host: String,

    /// Controller port
    #[arg(short, long, default_value_t = meca_client::config::DEFAULT_PORT)]
    port: u16,

    /// Disable end-of-block acks before sending
    #[arg(long)]
    no_eob: bool,

    /// Disable end-of-movement acks before sending
    #[arg(long)]
    no_eom: bool,

    /// Command name, e.g. GetJoints or MoveJoints
    command: String,

    /// Command arguments, in order
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> meca_client::Result<()> {
    let config = Config::builder().host(&args.host).port(args.port).build();
    let client = Client::connect(&config)?;

    if args.no_eob {
        client.set_eob(false)?;
    }
    if args.no_eom {
        client.set_eom(false)?;
    }

    let command_args: Vec<Arg> = args
        .args
        .iter()
        .map(|a| match a.parse::<Arg>() {
            Ok(arg) => arg,
            Err(never) => match never {},
        })
        .collect();

    match client.run(&args.command, &command_args)? {
        Outcome::Body(DecodedBody::Floats(values)) => println!("{:?}", values),
        Outcome::Body(DecodedBody::Ints(values)) => println!("{:?}", values),
        Outcome::Body(DecodedBody::Text(text)) => println!("{}", text),
        Outcome::Queueing => println!("(queued)"),
        Outcome::InErrorMode => println!("(session in error mode, not sent)"),
    }

    client.disconnect()
}
