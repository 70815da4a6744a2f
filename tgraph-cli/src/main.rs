//! tgraph CLI - inspect Tuist project graphs from the command line.
//!
//! Every command runs `tuist graph --format json` for the requested project
//! and renders the decoded graph.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::TgraphConfig;
use output::{OutputConfig, OutputFormat};

/// Inspect Tuist project graphs.
///
/// The graph is produced by `tuist graph`; set TUIST_CURRENT_BINARY_PATH to
/// run a specific binary instead of the one on PATH.
#[derive(Parser)]
#[command(name = "tgraph")]
#[command(author, version)]
#[command(about = "Inspect Tuist project graphs")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  tgraph load                    Summarize the project in the current directory
  tgraph load App Core           Load two projects concurrently
  tgraph targets -e DEVELOPER_DIR
  tgraph deps MyApp --format json")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load project graphs and print a summary
    Load {
        /// Project paths (defaults to the current directory)
        paths: Vec<PathBuf>,

        #[command(flatten)]
        tool: ToolArgs,
    },

    /// List targets in the project graph
    #[command(visible_alias = "t")]
    Targets {
        /// Project path (defaults to the current directory)
        path: Option<PathBuf>,

        /// Only list targets of this project
        #[arg(short, long)]
        project: Option<String>,

        #[command(flatten)]
        tool: ToolArgs,
    },

    /// Show direct dependencies of a target
    Deps {
        /// Target name
        target: String,

        /// Project path (defaults to the current directory)
        path: Option<PathBuf>,

        /// Project that owns the target, when several define it
        #[arg(short, long)]
        project: Option<String>,

        #[command(flatten)]
        tool: ToolArgs,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = TgraphConfig::load(std::path::Path::new("."));

    // CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });
    let output = OutputConfig::auto_detect(format, config.use_color());
    colored::control::set_override(!output.no_color);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Load { paths, tool } => load::run(&paths, &tool, &config, output).await,
        Commands::Targets {
            path,
            project,
            tool,
        } => targets::run(path, project.as_deref(), &tool, &config, output).await,
        Commands::Deps {
            target,
            path,
            project,
            tool,
        } => deps::run(&target, path, project.as_deref(), &tool, &config, output).await,
    }
}
