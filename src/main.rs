//! # Repo KB CLI (`kb`)
//!
//! Maintains the repository catalog inside `<kb_path>/CLAUDE.md`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kb init <kb_path>` | Create the directory and default document |
//! | `kb add <kb_path> --name N --summary S [--local-path P]` | Insert or update a record |
//! | `kb list <kb_path>` | Print every record as `name: summary` |
//! | `kb find <kb_path> --query Q` | Search names and summaries, print JSON |
//! | `kb get-path <kb_path> --name N` | Print a record's local path |
//!
//! Missing required flags print a one-line error to stderr and exit with
//! status 1. Lookups that find nothing are not errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use repo_kb::error::KbError;
use repo_kb::{catalog, config, logging, search};

/// Repo KB — a Markdown catalog of local repositories.
#[derive(Parser)]
#[command(
    name = "kb",
    about = "Repo KB — a Markdown catalog of local repositories",
    version
)]
struct Cli {
    /// Path to an optional configuration file (TOML).
    ///
    /// Without it, built-in defaults are used (document `CLAUDE.md`,
    /// log level `warn`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the knowledge base.
    ///
    /// Creates the directory and a default document if they are missing.
    /// Running it again is a no-op that reports the existing document.
    Init {
        /// Knowledge-base root directory.
        kb_path: PathBuf,
    },

    /// Add a repository, or update the one with the same name.
    Add {
        /// Knowledge-base root directory.
        kb_path: PathBuf,
        /// Repository name (exact, case-sensitive match on update).
        #[arg(long)]
        name: Option<String>,
        /// One-line summary.
        #[arg(long)]
        summary: Option<String>,
        /// Local checkout path. Defaults to `<kb_path>/<name>` for new records.
        #[arg(long)]
        local_path: Option<String>,
    },

    /// List all repositories.
    List {
        /// Knowledge-base root directory.
        kb_path: PathBuf,
    },

    /// Search names and summaries (case-insensitive substring).
    Find {
        /// Knowledge-base root directory.
        kb_path: PathBuf,
        /// Search query.
        #[arg(long)]
        query: Option<String>,
    },

    /// Print the local path of a repository, or an empty line.
    GetPath {
        /// Knowledge-base root directory.
        kb_path: PathBuf,
        /// Repository name (case-insensitive).
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };
    match logging::init(&cfg.logging.level) {
        Ok(()) | Err(logging::LoggingError::AlreadyInstalled(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let result = match cli.command {
        Commands::Init { kb_path } => catalog::run_init(&cfg, &kb_path),
        Commands::Add {
            kb_path,
            name,
            summary,
            local_path,
        } => catalog::run_add(
            &cfg,
            &kb_path,
            name.as_deref(),
            summary.as_deref(),
            local_path.as_deref(),
        ),
        Commands::List { kb_path } => catalog::run_list(&cfg, &kb_path),
        Commands::Find { kb_path, query } => search::run_find(&cfg, &kb_path, query.as_deref()),
        Commands::GetPath { kb_path, name } => {
            search::run_get_path(&cfg, &kb_path, name.as_deref())
        }
    };

    if let Err(e) = &result {
        if let Some(kb_err) = e.downcast_ref::<KbError>() {
            if kb_err.is_usage_error() {
                eprintln!("Error: {}", kb_err);
                std::process::exit(1);
            }
        }
    }

    result
}
