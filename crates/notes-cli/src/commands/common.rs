use std::path::Path;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};
use notes_core::presenter::{CategoryListPresenter, CategoryListView};
use notes_core::{Note, NoteId, Store};
use serde::Serialize;

use crate::error::CliError;

/// Characters of a note id shown in listings (the v7 timestamp part)
const SHORT_ID_LEN: usize = 13;
/// Candidates named when an id prefix is ambiguous
const MAX_LISTED_MATCHES: usize = 3;
const TITLE_COLUMN_WIDTH: usize = 40;
const ELLIPSIS: &str = "...";

/// One row of `note list`, in text or JSON form
#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub age: String,
}

impl NoteListItem {
    pub fn from_note(note: &Note, store: &Store, now_ms: i64) -> Result<Self, CliError> {
        let category = match note.category_id {
            Some(category_id) => store.get_category(&category_id)?.map(|category| category.name),
            None => None,
        };

        Ok(Self {
            id: note.id.to_string(),
            title: note.title.clone(),
            category,
            created_at: note.created_at,
            updated_at: note.updated_at,
            age: format_relative_time(note.updated_at, now_ms),
        })
    }

    /// Fixed-width listing line; the category goes last in brackets
    pub fn line(&self) -> String {
        let headline = self.title.lines().next().unwrap_or_default();
        let title = preview(headline, TITLE_COLUMN_WIDTH);
        let id = short_id(&self.id);
        let mut line = format!("{id:<SHORT_ID_LEN$}  {title:<TITLE_COLUMN_WIDTH$}  ");
        match &self.category {
            Some(category) => line.push_str(&format!("{:<10}  [{category}]", self.age)),
            None => line.push_str(&self.age),
        }
        line
    }
}

pub fn list_items(notes: &[Note], store: &Store) -> Result<Vec<NoteListItem>, CliError> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| NoteListItem::from_note(note, store, now_ms))
        .collect()
}

pub fn open_store(path: &Path) -> Result<Rc<Store>, CliError> {
    Ok(Rc::new(Store::open_path(path)?))
}

/// Find a note by full id, or by an id prefix that matches exactly one note
pub fn resolve_note(query: &str, store: &Store) -> Result<Note, CliError> {
    let query = normalize_note_identifier(query)?;

    let exact = match query.parse::<NoteId>() {
        Ok(note_id) => store.get_note(&note_id)?,
        Err(_) => None,
    };
    if let Some(note) = exact {
        return Ok(note);
    }

    let mut candidates = store.list_note_ids_by_prefix(&query, MAX_LISTED_MATCHES + 1)?;
    match candidates.len() {
        0 => Err(CliError::NoteNotFound(query)),
        1 => {
            let note_id = candidates
                .remove(0)
                .parse::<NoteId>()
                .map_err(|_| CliError::NoteNotFound(query.clone()))?;
            store
                .get_note(&note_id)?
                .ok_or(CliError::NoteNotFound(query))
        }
        _ => {
            candidates.truncate(MAX_LISTED_MATCHES);
            let shown = candidates
                .iter()
                .map(|id| short_id(id))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousNoteId(format!(
                "Note id '{query}' matches more than one note: {shown}"
            )))
        }
    }
}

/// Index of the row named `name`, ignoring case
pub fn find_row<V: CategoryListView>(
    presenter: &CategoryListPresenter<V>,
    name: &str,
) -> Result<usize, CliError> {
    presenter
        .rows()
        .iter()
        .position(|row| row.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CliError::CategoryNotFound(name.to_string()))
}

/// First line of the note's title, squeezed to `max_chars`
pub fn note_preview(note: &Note, max_chars: usize) -> String {
    preview(note.headline(), max_chars)
}

fn preview(text: &str, max_chars: usize) -> String {
    let squeezed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if squeezed.chars().count() <= max_chars {
        return squeezed;
    }
    let kept = squeezed
        .chars()
        .take(max_chars.saturating_sub(ELLIPSIS.len()))
        .collect::<String>();
    format!("{kept}{ELLIPSIS}")
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Age of `timestamp_ms` at `now_ms`; a calendar date once it is a week old
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    // Future timestamps count as "just now"
    let age = TimeDelta::milliseconds(now_ms.saturating_sub(timestamp_ms).max(0));

    if age.num_minutes() < 1 {
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_days() < 1 {
        format!("{}h ago", age.num_hours())
    } else if age.num_weeks() < 1 {
        format!("{}d ago", age.num_days())
    } else {
        DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
            || timestamp_ms.to_string(),
            |at| at.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Join words given on the command line; `None` when nothing is left
pub fn normalize_words(parts: &[String]) -> Option<String> {
    let joined = parts.join(" ");
    Some(joined.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    Some(id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(CliError::EmptyNoteId)
}
