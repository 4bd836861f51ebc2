//! Reflect CLI
//!
//! Command-line interface for the Reflect learning journal. Running
//! `reflect` with no subcommand prompts for a new entry.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reflect_core::{Config, Placement};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "reflect")]
#[command(about = "Reflect - a learning journal kept in one JSON file")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a journal entry (prompts for missing fields)
    #[command(alias = "new")]
    Add {
        /// Entry title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Entry content
        #[arg(short = 'C', long)]
        content: Option<String>,
        /// Put the entry at the end of the file instead of the front
        #[arg(long, conflicts_with = "front")]
        back: bool,
        /// Put the entry at the front of the file
        #[arg(long)]
        front: bool,
    },
    /// List all entries
    #[command(alias = "ls")]
    List,
    /// Delete an entry by id
    #[command(alias = "rm")]
    Delete {
        /// Entry id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, entries_file, cli_placement, port, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let store = config.store();
    tracing::debug!(entries = %store.path().display(), "Using entries file");

    match cli.command {
        None => commands::entry::add(&store, None, None, config.cli_placement, &output),
        Some(Commands::Add {
            title,
            content,
            back,
            front,
        }) => {
            let placement = if back {
                Placement::Back
            } else if front {
                Placement::Front
            } else {
                config.cli_placement
            };
            commands::entry::add(&store, title, content, placement, &output)
        }
        Some(Commands::List) => commands::entry::list(&store, &output),
        Some(Commands::Delete { id, force }) => {
            commands::entry::delete(&store, id, force, &output)
        }
        Some(Commands::Config { .. }) => unreachable!(), // Handled above
    }
}

/// Log to stderr so warnings never mix with command output
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "reflect_core={},reflect_cli={}",
            default_level, default_level
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
