//! # Chatbot Engine CLI (`chatbot`)
//!
//! ## Usage
//!
//! ```bash
//! chatbot --config ./config/chatbot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `chatbot init` | Create the SQLite database and the knowledge table |
//! | `chatbot entries` | List knowledge entries in match-priority order |
//! | `chatbot ask "<query>"` | Answer one query from the knowledge base |
//! | `chatbot serve` | Start the HTTP server (`POST /respond`) |

mod ask;
mod config;
mod db;
mod entries;
mod knowledge;
mod migrate;
mod server;
mod sqlite_source;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Chatbot Engine: a rule-based question-answering service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with `[db]`, `[knowledge]`, and `[server]` sections.
#[derive(Parser)]
#[command(
    name = "chatbot",
    about = "Chatbot Engine: rule-based question answering over a SQLite knowledge table",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/chatbot.toml")]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite file and the knowledge table. Writes no rows and
    /// is safe to run repeatedly.
    Init,

    /// List knowledge entries in the order the matcher scans them.
    Entries {
        /// Print entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Answer a single query and exit.
    Ask {
        /// The question to answer.
        query: String,

        /// Also print the normalized query and the matching entry.
        #[arg(long)]
        explain: bool,
    },

    /// Load the knowledge base and start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves `POST /respond`, `GET /health`,
    /// and `POST /reload` until interrupted.
    Serve,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "chatbot_engine=debug,tower_http=debug"
    } else {
        "chatbot_engine=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Entries { json } => {
            entries::run_entries(&cfg, json).await?;
        }
        Commands::Ask { query, explain } => {
            ask::run_ask(&cfg, &query, explain).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
