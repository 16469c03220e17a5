//! Notes CLI - file notes under categories from the terminal

mod cli;
mod commands;
mod config;
mod error;
mod terminal;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{CategoryCommand, Cli, Commands, NoteCommand};
use crate::commands::category::{
    run_category_add, run_category_delete, run_category_list, run_category_pick,
    run_category_rename,
};
use crate::commands::completions::run_completions;
use crate::commands::note::{run_note_add, run_note_list};
use crate::config::CliConfig;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notes=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        command,
        db_path,
        config,
    } = Cli::parse();

    match command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Note(command) => {
            let (_, db_path) = load_settings(config.as_deref(), db_path)?;
            match command {
                NoteCommand::Add { title } => run_note_add(&title, &db_path),
                NoteCommand::List { json } => run_note_list(json, &db_path),
            }
        }
        Commands::Category(command) => {
            let (config, db_path) = load_settings(config.as_deref(), db_path)?;
            let presenter = &config.presenter;
            match command {
                CategoryCommand::List { note, json } => {
                    run_category_list(&note, json, presenter, &db_path)
                }
                CategoryCommand::Pick { note, name } => {
                    run_category_pick(&note, &name, presenter, &db_path)
                }
                CategoryCommand::Add { name } => run_category_add(&name, &db_path),
                CategoryCommand::Rename { name, new_name } => {
                    run_category_rename(&name, &new_name, &db_path)
                }
                CategoryCommand::Delete { name, note } => {
                    run_category_delete(&name, note.as_deref(), presenter, &db_path)
                }
            }
        }
    }
}

/// Config file plus the database path it resolves to.
fn load_settings(
    config_path: Option<&Path>,
    cli_db_path: Option<PathBuf>,
) -> Result<(CliConfig, PathBuf), CliError> {
    let config = CliConfig::load(config_path)?;
    let db_path = config.resolve_db_path(cli_db_path)?;
    tracing::debug!(path = %db_path.display(), "Using database");
    Ok((config, db_path))
}
