//! Harvestly CLI - operational tools for the RPC backend.
//!
//! # Usage
//!
//! ```bash
//! # Check gateway connectivity with the configured credentials
//! harvestly gateway ping
//!
//! # List every registered RPC operation
//! harvestly ops list
//!
//! # Generate wallet display IDs
//! harvestly wallet-id generate --count 3
//!
//! # Format or validate an existing display ID
//! harvestly wallet-id format 123456789012
//! harvestly wallet-id check 123456789012
//! ```
//!
//! # Commands
//!
//! - `gateway ping` - Probe the remote data gateway
//! - `ops list` - List registered operations with mode and tier
//! - `wallet-id` - Generate, format, and validate wallet display IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "harvestly")]
#[command(author, version, about = "Harvestly CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interact with the remote data gateway
    Gateway {
        #[command(subcommand)]
        action: GatewayAction,
    },
    /// Inspect the RPC operation registry
    Ops {
        #[command(subcommand)]
        action: OpsAction,
    },
    /// Wallet display ID utilities
    WalletId {
        #[command(subcommand)]
        action: WalletIdAction,
    },
}

#[derive(Subcommand)]
enum GatewayAction {
    /// Probe gateway connectivity with the configured credentials
    Ping,
}

#[derive(Subcommand)]
enum OpsAction {
    /// List registered operations with their mode and auth tier
    List {
        /// Emit the listing as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WalletIdAction {
    /// Generate fresh wallet display IDs
    Generate {
        /// Number of IDs to generate
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Format a display ID into dash-separated groups
    Format {
        /// The 12-digit display ID
        id: String,
    },
    /// Check whether a string is a valid display ID
    Check {
        /// The candidate display ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Gateway { action } => match action {
            GatewayAction::Ping => commands::gateway::ping().await?,
        },
        Commands::Ops { action } => match action {
            OpsAction::List { json } => commands::ops::list(json)?,
        },
        Commands::WalletId { action } => match action {
            WalletIdAction::Generate { count } => commands::wallet_id::generate(count),
            WalletIdAction::Format { id } => commands::wallet_id::format(&id),
            WalletIdAction::Check { id } => commands::wallet_id::check(&id)?,
        },
    }
    Ok(())
}
