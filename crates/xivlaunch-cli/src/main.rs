//! xivlaunch binary entry point.
//!
//! A thin wrapper around the xivlaunch crates that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Runs the selected command and prints its output

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xivlaunch_protocol::{HttpConfig, LauncherConfig};

#[derive(Debug, Parser)]
#[command(
    name = "xivlaunch",
    about = "Inspect FFXIV patch lists, encode launch data and check server status",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a patch list and print its records
    PatchList {
        /// Patch list body as returned by a version server
        file: PathBuf,
    },

    /// Encrypt game launch arguments
    EncodeArgs {
        /// Tick count the key is derived from, defaults to the current tick count
        #[arg(long)]
        ticks: Option<u32>,

        /// Arguments in ` /key =value` form
        arguments: String,
    },

    /// Encrypt a platform session ticket
    EncodeTicket {
        /// Server time the ticket was issued at, in Unix seconds
        #[arg(long)]
        time: u32,

        /// Ticket bytes as hex
        ticket: String,
    },

    /// Check whether the login and game servers are open
    Status {
        /// Frontier server base URL
        #[arg(long, env = "XIVLAUNCH_FRONTIER_URL")]
        frontier_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("Running {:?}", cli.command);

    let output = match cli.command {
        Commands::PatchList { file } => commands::patch_list(&file)?,
        Commands::EncodeArgs { ticks, arguments } => commands::encode_args(&arguments, ticks)?,
        Commands::EncodeTicket { time, ticket } => commands::encode_ticket(&ticket, time)?,
        Commands::Status { frontier_url } => {
            let mut config = LauncherConfig {
                http: HttpConfig::interactive(),
                ..LauncherConfig::from_env()
            };
            if let Some(url) = frontier_url {
                config.frontier_url = url.trim_end_matches('/').to_string();
            }
            commands::status(config).await?
        }
    };

    println!("{output}");
    Ok(())
}
