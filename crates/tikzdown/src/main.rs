//! tikzdown CLI - Markdown to HTML with TikZ diagrams.
//!
//! Provides commands for:
//! - `convert`: Convert one markdown file (or stdin) to HTML
//! - `watch`: Reconvert markdown files in a directory whenever they change
//! - `on-change`: Run a command whenever matching files change

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, OnChangeArgs, WatchArgs};
use output::Output;

/// tikzdown - Markdown to HTML with TikZ diagrams.
#[derive(Parser)]
#[command(name = "tikzdown", version, about)]
struct Cli {
    /// Enable verbose output (show compiler runs and conversion logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a markdown document to HTML.
    Convert(ConvertArgs),
    /// Watch a directory and reconvert changed markdown files.
    Watch(WatchArgs),
    /// Watch a directory and run a command when matching files change.
    OnChange(OnChangeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Watch(args) => args.execute(),
        Commands::OnChange(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
