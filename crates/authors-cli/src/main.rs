//! Authors CLI
//!
//! Command-line interface for the authors directory: search and sort the
//! catalog, follow authors, and edit their aliases.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use authors_core::{Catalog, Config, FileStore, SortMode, Store, StoreError};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "authors")]
#[command(about = "Search, follow, and alias content creators")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List authors, optionally filtered and sorted
    #[command(alias = "ls")]
    List {
        /// Match against name, bio, alias, or tags
        #[arg(short = 'Q', long, default_value = "")]
        query: String,
        /// popular, az, or recent (defaults to the configured sort)
        #[arg(short, long)]
        sort: Option<SortMode>,
    },
    /// Show author details
    Show {
        /// Author ID
        id: String,
    },
    /// Follow an author
    Follow {
        /// Author ID
        id: String,
    },
    /// Unfollow an author
    Unfollow {
        /// Author ID
        id: String,
    },
    /// Toggle following an author
    Toggle {
        /// Author ID
        id: String,
    },
    /// List followed authors
    Following,
    /// Manage author aliases
    Alias {
        #[command(subcommand)]
        command: AliasCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AliasCommands {
    /// Save an alias fragment for an author
    Set {
        /// Author ID
        id: String,
        /// Fragment (1-30 chars: a-z, 0-9, hyphen)
        fragment: String,
    },
    /// Preview how a fragment renders without saving
    Preview {
        /// Fragment to preview
        fragment: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, catalog_path, default_sort, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need the store
    let command = match cli.command {
        Commands::Config { command } => {
            return handle_config_command(command, cli.config.as_ref(), &output);
        }
        Commands::Alias {
            command: AliasCommands::Preview { fragment },
        } => {
            commands::alias::preview(&fragment, &output);
            return Ok(());
        }
        other => other,
    };

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(cli.verbose, config.log_file.as_deref());

    let result = run(command, &config, &output);

    if let Err(ref e) = result {
        if let Some(suggestion) = recovery_suggestion(e) {
            output.warning(suggestion);
        }
    }
    result
}

fn run(command: Commands, config: &Config, output: &Output) -> Result<()> {
    let catalog = Catalog::from_config(config).context("Failed to load author catalog")?;
    let gateway = FileStore::from_config(config).context("Failed to open storage")?;
    if let Some(corrupt) = gateway.recovered() {
        output.warning(&corrupt.to_string());
        if let Some(suggestion) = corrupt.recovery_suggestion() {
            output.warning(suggestion);
        }
    }
    let mut store = Store::initialize(catalog, gateway);

    for issue in store.load_issues() {
        output.warning(&format!("Some saved state could not be loaded: {}", issue));
    }

    match command {
        Commands::List { query, sort } => commands::author::list(
            &store,
            &query,
            sort.unwrap_or(config.default_sort),
            output,
        ),
        Commands::Show { id } => commands::author::show(&store, &id, output),
        Commands::Follow { id } => commands::follow::set(&mut store, &id, true, output),
        Commands::Unfollow { id } => commands::follow::set(&mut store, &id, false, output),
        Commands::Toggle { id } => commands::follow::toggle(&mut store, &id, output),
        Commands::Following => commands::author::following(&store, output),
        Commands::Alias {
            command: AliasCommands::Set { id, fragment },
        } => commands::alias::set(&mut store, &id, &fragment, output),
        // Handled in main before the store is opened
        Commands::Alias {
            command: AliasCommands::Preview { .. },
        }
        | Commands::Config { .. } => unreachable!(),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(&key, &value, config_path, output)
        }
    }
}

/// Find a storage recovery hint anywhere in the error chain
fn recovery_suggestion(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(StoreError::Persistence(e)) = cause.downcast_ref::<StoreError>() {
            return e.recovery_suggestion();
        }
        cause
            .downcast_ref::<authors_core::StorageError>()
            .and_then(|e| e.recovery_suggestion())
    })
}

/// Initialize logging to stderr, or to the configured log file
///
/// `AUTHORS_LOG` takes precedence over the verbosity flag.
fn init_logging(verbose: u8, log_file: Option<&Path>) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_env("AUTHORS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!("authors_core={},authors_cli={}", level, level))
    });

    match log_file {
        Some(path) => {
            let file = match File::create(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", path, e);
                    return;
                }
            };
            // Ignore error if already initialized
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(file)
                .try_init();
            info!("Logging initialized to {:?}", path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authors_core::StorageError;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_sort() {
        let cli = Cli::try_parse_from(["authors", "ls", "-Q", "cyber", "--sort", "az"]).unwrap();
        match cli.command {
            Commands::List { query, sort } => {
                assert_eq!(query, "cyber");
                assert_eq!(sort, Some(SortMode::Az));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["authors", "list", "--sort", "oldest"]).is_err());
    }

    #[test]
    fn test_parse_alias_set() {
        let cli = Cli::try_parse_from(["authors", "--json", "alias", "set", "a1", "Dark-Akira"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Alias {
                command: AliasCommands::Set { .. }
            }
        ));
    }

    #[test]
    fn test_recovery_suggestion_from_chain() {
        let storage = StorageError::Unavailable {
            key: "k".to_string(),
            details: "down".to_string(),
        };
        let err = anyhow::Error::from(StoreError::Persistence(storage)).context("Failed to save");
        assert!(recovery_suggestion(&err).is_some());

        let plain = anyhow::anyhow!("Author not found: x");
        assert!(recovery_suggestion(&plain).is_none());
    }
}
