//! Berth operator binary.
//!
//! Observes a bus passively for a bounded window and prints one free
//! node-ID to stdout, ready for scripting:
//!
//! ```text
//! NODE_ID=$(berth --transport=udp:0.0.0.0:9382 --window=5s)
//! ```
//!
//! Logs go to stderr so stdout stays machine-consumable.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use berth_alloc::{allocate, AllocateOptions};
use berth_transport::TransportConfig;

/// Allocate a free node-ID by passive bus observation.
#[derive(Debug, Parser)]
#[command(name = "berth", version)]
struct Args {
    /// Transport to observe: "loopback" or "udp:<bind-addr>".
    #[arg(short, long, env = "BERTH_TRANSPORT")]
    transport: TransportConfig,

    /// How long to listen before choosing, e.g. "5s" or "500ms".
    #[arg(short, long, default_value = "5s", value_parser = humantime::parse_duration)]
    window: Duration,

    /// Pin the selection RNG for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Show verbose log messages. Repeat for extra verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = AllocateOptions {
        transport: args.transport,
        window: args.window,
        seed: args.seed,
    };
    let node_id = allocate(options).await?;
    println!("{node_id}");
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let default_filter = format!("berth_alloc={level},berth_transport={level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
