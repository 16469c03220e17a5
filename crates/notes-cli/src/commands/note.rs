use std::path::Path;

use crate::commands::common::{list_items, normalize_words, open_store};
use crate::error::CliError;

pub fn run_note_add(title_parts: &[String], db_path: &Path) -> Result<(), CliError> {
    let title = normalize_words(title_parts).ok_or(CliError::EmptyTitle)?;

    let store = open_store(db_path)?;
    let note = store.create_note(&title)?;
    tracing::debug!(note = %note.id, "Created note");

    println!("{}", note.id);
    Ok(())
}

/// Print every note, most recently updated first
pub fn run_note_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let items = list_items(&store.list_notes()?, &store)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &items {
            println!("{}", item.line());
        }
    }

    Ok(())
}
