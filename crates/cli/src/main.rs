//! Cephas CLI - session store migrations and route inspection.
//!
//! # Usage
//!
//! ```bash
//! # Create the PostgreSQL session table
//! cephas-cli migrate
//!
//! # Print the sidebar a role sees
//! cephas-cli nav --role supervisor
//!
//! # Ask the role gate about one path
//! cephas-cli gate --role installer --path /activations/unassigned
//! cephas-cli gate --path /dashboard          # signed out
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session store schema
//! - `nav` - Sidebar and composed routes for a role
//! - `gate` - Gate decision for a path

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cephas-cli")]
#[command(author, version, about = "Cephas Tracker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the `PostgreSQL` session store schema
    Migrate,
    /// Print the sidebar and protected routes for a role
    Nav {
        /// Role (`super-admin`, `supervisor`, `installer`, `accountant`, `warehouse`)
        #[arg(short, long)]
        role: String,
    },
    /// Print the role gate's decision for a path
    Gate {
        /// Role of the signed-in user; omit for a signed-out visitor
        #[arg(short, long)]
        role: Option<String>,

        /// Request path
        #[arg(short, long)]
        path: String,
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Nav { role } => commands::nav::sidebar(&role)?,
        Commands::Gate { role, path } => commands::nav::gate(role.as_deref(), &path),
    }
    Ok(())
}
