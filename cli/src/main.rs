//! # porbeagle-cli
//!
//! Command-line front end for the porbeagle view generator.
//!
//! ## Commands
//!
//! - `porbeagle generate` - Write view companions for a crate or snapshot
//! - `porbeagle inspect` - Show how every view's members are classified
//! - `porbeagle snapshot` - Dump the declaration snapshot of a crate as JSON
//!
//! See `porbeagle --help` for the full command reference.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;

mod commands;
mod config;
mod ui;

#[derive(Parser)]
#[command(name = "porbeagle")]
#[command(about = "Generate and inspect porbeagle message-view companions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to porbeagle.toml (defaults to ./porbeagle.toml when present)
    #[arg(short, long, global = true, env = "PORBEAGLE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Where declarations come from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Source directory of the crate to scan
    #[arg(long, default_value = "src", conflicts_with = "snapshot")]
    pub src: PathBuf,

    /// JSON declaration snapshot to read instead of scanning sources
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate view companions and their per-module include manifests
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory for generated files
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Show the classification of every view without writing anything
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON (machine-readable format)
        #[arg(long)]
        json: bool,
    },

    /// Dump the declaration snapshot of a source tree as JSON
    Snapshot {
        /// Source directory of the crate to scan
        #[arg(long, default_value = "src")]
        src: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "porbeagle", &mut io::stdout());
        return;
    }

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = config::load_config(cli.config.as_deref())?;

    match command {
        Commands::Generate { input, out } => commands::generate::generate(&config, &input, &out),
        Commands::Inspect { input, json } => commands::inspect::inspect(&config, &input, json),
        Commands::Snapshot { src, out } => commands::snapshot::snapshot(&config, &src, out.as_deref()),
    }
}
