use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Keep notes organized by category")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create and list notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Browse, pick and edit categories
    #[command(subcommand)]
    #[command(alias = "cat")]
    Category(CategoryCommand),
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: Vec<String>,
    },
    /// List notes, most recently updated first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Show the category picker for a note
    List {
        /// Note ID or unique ID prefix
        #[arg(long)]
        note: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// File a note under a category
    Pick {
        /// Note ID or unique ID prefix
        #[arg(long)]
        note: String,
        /// Category name
        name: Vec<String>,
    },
    /// Create a new category
    #[command(alias = "new")]
    Add {
        /// Category name
        name: Vec<String>,
    },
    /// Rename a category
    Rename {
        /// Current category name
        name: String,
        /// New category name
        new_name: String,
    },
    /// Delete a category; notes filed under it become uncategorized
    Delete {
        /// Category name
        name: Vec<String>,
        /// Delete from this note's picker and show the updated list
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
