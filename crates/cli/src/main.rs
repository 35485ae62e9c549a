//! ScopeDesk CLI — the main entry point.
//!
//! Commands:
//! - `init`    — Write a starter config
//! - `chat`    — Interactive question panel
//! - `ask`     — Answer a single question and exit
//! - `users`   — List the identities you can act as
//! - `view`    — Print the rows an identity can see
//! - `status`  — Show resolved configuration
//! - `doctor`  — Diagnose config, data and provider access

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "scopedesk",
    about = "ScopeDesk — ask questions about the student data your role may see",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Student dataset (CSV); overrides config and SCOPEDESK_DATA
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// API key for the reasoning service (never written to disk)
    #[arg(
        long,
        global = true,
        value_name = "KEY",
        env = "SCOPEDESK_API_KEY",
        hide_env_values = true
    )]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config to ~/.scopedesk/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Chat with the panel
    Chat {
        /// Identity to start as (display name); defaults to the first entry
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Ask one question and print the answer
    Ask {
        /// The question
        #[arg(short, long)]
        message: String,

        /// Identity to act as (display name); defaults to the first entry
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List available identities
    Users,

    /// Print the rows visible to an identity
    View {
        /// Identity to act as (display name); defaults to the first entry
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show resolved configuration
    Status,

    /// Diagnose configuration, dataset and provider access
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let globals = commands::Globals {
        data: cli.data,
        api_key: cli.api_key,
    };

    match cli.command {
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Chat { user } => commands::chat::run(&globals, user).await?,
        Commands::Ask { message, user } => commands::ask::run(&globals, user, &message).await?,
        Commands::Users => commands::users::run().await?,
        Commands::View { user } => commands::view::run(&globals, user).await?,
        Commands::Status => commands::status::run(&globals).await?,
        Commands::Doctor => commands::doctor::run(&globals).await?,
    }

    Ok(())
}
