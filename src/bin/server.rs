//! SeqLog Server Binary
//!
//! Starts the TCP server for SeqLog.

use std::sync::Arc;

use clap::Parser;
use seqlog::network::Server;
use seqlog::{Config, Log};
use tracing_subscriber::{fmt, EnvFilter};

/// SeqLog Server
#[derive(Parser, Debug)]
#[command(name = "seqlog-server")]
#[command(about = "In-memory append-only record log")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Maximum queued connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Maximum number of records to hold (unbounded if omitted)
    #[arg(short, long)]
    capacity: Option<usize>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seqlog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SeqLog Server v{}", seqlog::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let mut builder = Config::builder()
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_connections(args.max_connections);
    if let Some(capacity) = args.capacity {
        builder = builder.log_capacity(capacity);
    }
    let config = builder.build();

    let log = match config.log_capacity {
        Some(limit) => {
            tracing::info!("Log capacity: {} records", limit);
            Arc::new(Log::with_capacity_limit(limit))
        }
        None => Arc::new(Log::new()),
    };

    let mut server = match Server::bind(config, log) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
