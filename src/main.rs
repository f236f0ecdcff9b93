//! Binary entry point for promptstash.
//!
//! This binary is the thin presentation layer over the state engine: it
//! opens the store, dispatches intents for each subcommand, and renders the
//! returned state.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use promptstash::cli::{self, AddArgs, CategoryAction};
use promptstash::engine::Store;
use promptstash::io::Format;
use promptstash::models::SortMode;
use promptstash::storage::JsonFileRepository;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Promptstash - a personal library of reusable prompt templates.
#[derive(Parser)]
#[command(name = "promptstash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the persisted state slot (defaults to the platform data dir).
    #[arg(long, global = true, env = "PROMPTSTASH_DATA")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List prompts in the resolved sort order.
    List {
        /// Filter by category label.
        #[arg(short, long)]
        category: Option<String>,

        /// Sort mode: recent, click, or manual.
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Show one prompt in full.
    Show {
        /// Prompt id.
        id: String,
    },

    /// Create a prompt.
    Add {
        /// Display title.
        #[arg(short, long)]
        title: String,

        /// Template body with {{variable}} placeholders.
        content: String,

        /// Category label.
        #[arg(short = 'g', long)]
        category: Option<String>,

        /// Description.
        #[arg(short, long)]
        description: Option<String>,

        /// Tags (comma-separated).
        #[arg(long)]
        tags: Option<String>,
    },

    /// Print a prompt body and count the use.
    Copy {
        /// Prompt id.
        id: String,
    },

    /// Toggle a prompt's pinned flag.
    Pin {
        /// Prompt id.
        id: String,
    },

    /// Delete a prompt.
    Delete {
        /// Prompt id.
        id: String,
    },

    /// Manage the category taxonomy.
    Categories {
        /// Taxonomy subcommand.
        #[command(subcommand)]
        action: CategoriesAction,
    },

    /// Write a dated backup file.
    Export {
        /// Backup format: csv or md.
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output path (defaults to the dated backup filename).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a backup file (format detected from the extension).
    Import {
        /// Backup file path.
        file: PathBuf,
    },
}

/// Taxonomy subcommands.
#[derive(Subcommand)]
enum CategoriesAction {
    /// List all categories.
    List,
    /// Append a generated category.
    Add,
    /// Rename a category, cascading to its prompts.
    Rename {
        /// Current label.
        old: String,
        /// Replacement label.
        new: String,
    },
    /// Delete a category, reassigning its prompts.
    Delete {
        /// Label to delete.
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let repository = match cli.data_file {
        Some(path) => JsonFileRepository::new(path),
        None => match JsonFileRepository::default_slot() {
            Ok(repo) => repo,
            Err(e) => {
                eprintln!("Failed to resolve the data directory: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let store = match Store::open(Box::new(repository)) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open the prompt store: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_command(cli.command, store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(command: Commands, mut store: Store) -> promptstash::Result<()> {
    match command {
        Commands::List { category, sort } => {
            let sort = match sort {
                Some(name) => Some(SortMode::parse(&name).ok_or_else(|| {
                    promptstash::Error::InvalidInput(format!("unknown sort mode: {name}"))
                })?),
                None => None,
            };
            cli::cmd_list(&store, category.as_deref(), sort)
        }
        Commands::Show { id } => cli::cmd_show(&store, &id),
        Commands::Add {
            title,
            content,
            category,
            description,
            tags,
        } => cli::cmd_add(
            &mut store,
            AddArgs {
                title,
                content,
                category,
                description,
                tags,
            },
        ),
        Commands::Copy { id } => cli::cmd_copy(&mut store, &id),
        Commands::Pin { id } => cli::cmd_pin(&mut store, &id),
        Commands::Delete { id } => cli::cmd_delete(&mut store, &id),
        Commands::Categories { action } => {
            let action = match action {
                CategoriesAction::List => CategoryAction::List,
                CategoriesAction::Add => CategoryAction::Add,
                CategoriesAction::Rename { old, new } => CategoryAction::Rename { old, new },
                CategoriesAction::Delete { name } => CategoryAction::Delete { name },
            };
            cli::cmd_categories(&mut store, action)
        }
        Commands::Export { format, output } => {
            let format = Format::from_str(&format)?;
            cli::cmd_export(&store, format, output)
        }
        Commands::Import { file } => cli::cmd_import(&mut store, &file),
    }
}
