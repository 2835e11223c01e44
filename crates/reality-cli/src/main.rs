mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reality",
    about = "Multi-source reality check — probe independent truth sources and gate on their consensus",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .reality/ or .git/)
    #[arg(long, global = true, env = "REALITY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a consensus check and gate on the result
    Check {
        /// Mode: emergency, quick, or full
        #[arg(default_value = "quick")]
        mode: String,
    },

    /// Show the latest persisted report
    Status,

    /// Show the historical consensus log
    History {
        /// Number of most recent entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List registered source checkers and their configuration state
    Sources,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Check { mode } => cmd::check::run(&root, &mode, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::History { limit } => cmd::history::run(&root, limit, cli.json),
        Commands::Sources => cmd::sources::run(&root, cli.json),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display).
            // Exit 2 keeps tool misconfiguration distinct from a BLOCKED
            // verdict (exit 1).
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}
