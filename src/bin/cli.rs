//! SeqLog CLI Client
//!
//! Command-line interface for producing and consuming records.

use clap::{Parser, Subcommand};
use seqlog::network::Client;

/// SeqLog CLI
#[derive(Parser, Debug)]
#[command(name = "seqlog-cli")]
#[command(about = "CLI for the SeqLog record log")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a record and print its offset
    Produce {
        /// The record value
        value: String,
    },

    /// Print the record stored at an offset
    Consume {
        /// The offset to read
        offset: u64,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> seqlog::Result<()> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::Produce { value } => {
            let offset = client.produce(value.into_bytes())?;
            println!("{}", offset);
        }
        Commands::Consume { offset } => {
            let record = client.consume(offset)?;
            println!("{}", String::from_utf8_lossy(&record.value));
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}
