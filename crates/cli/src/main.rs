//! Tienditas CLI - Store document management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the data directory with the default stores (refuses to overwrite)
//! tienditas-cli seed
//!
//! # Reset the document to the defaults
//! tienditas-cli seed --force
//!
//! # Dump the persisted collection as JSON
//! tienditas-cli export
//!
//! # List store identifiers and names
//! tienditas-cli stores
//! ```
//!
//! The data directory comes from `TIENDITAS_DATA_DIR` (default `./data`),
//! exactly as the server resolves it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tienditas-cli")]
#[command(author, version, about = "Tienditas CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default store collection to the data directory
    Seed {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },
    /// Print the persisted collection as pretty JSON
    Export,
    /// List store identifiers and display names
    Stores,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { force } => commands::seed::run(force)?,
        Commands::Export => commands::export::dump()?,
        Commands::Stores => commands::export::list()?,
    }
    Ok(())
}
