//! Portell CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the document tables and the session table
//! portell-cli migrate
//!
//! # Load products and events from a YAML file
//! portell-cli seed data/seed.yaml
//!
//! # Hash the admin password for ADMIN_PASSWORD_HASH
//! portell-cli admin hash-password 'correct horse battery staple'
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert catalog data through the gateway
//! - `admin hash-password` - Print an argon2 hash for the admin login

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "portell-cli")]
#[command(author, version, about = "Portell Winery CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert products and events from a YAML file
    Seed {
        /// Path to the YAML file (`products:` and `events:` lists)
        file: String,
    },
    /// Admin credential helpers
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Print an argon2 hash to put in `ADMIN_PASSWORD_HASH`
    HashPassword {
        /// Plain-text password
        password: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            commands::seed::catalog(&file).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::HashPassword { password } => {
                commands::admin::hash_password(&password)?;
            }
        },
    }
    Ok(())
}
