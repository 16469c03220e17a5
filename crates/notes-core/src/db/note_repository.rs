//! Note repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::{Error, Result};
use crate::models::{CategoryId, Note, NoteId};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for note storage operations
pub trait NoteRepository {
    /// Create a new, uncategorized note
    fn create(&self, title: &str) -> Result<Note>;

    /// Get a note by ID
    fn get(&self, id: &NoteId) -> Result<Option<Note>>;

    /// List notes, most recently updated first
    fn list(&self) -> Result<Vec<Note>>;

    /// Set or clear the note's category
    fn assign_category(&self, id: &NoteId, category: Option<&CategoryId>) -> Result<Note>;

    /// IDs starting with `prefix`, at most `limit` of them
    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// `SQLite` implementation of `NoteRepository`
pub struct SqliteNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        let id: String = row.get(0)?;
        let id = id.parse::<NoteId>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(error))
        })?;
        let category_id = row
            .get::<_, Option<String>>(2)?
            .map(|value| value.parse::<CategoryId>())
            .transpose()
            .map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(error))
            })?;
        Ok(Note {
            id,
            title: row.get(1)?,
            category_id,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create(&self, title: &str) -> Result<Note> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Note title cannot be empty".into()));
        }

        let note = Note::new(title);
        self.conn.execute(
            "INSERT INTO notes (id, title, category_id, created_at, updated_at) VALUES (?, ?, NULL, ?, ?)",
            params![note.id.as_str(), note.title, note.created_at, note.updated_at],
        )?;

        Ok(note)
    }

    fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, title, category_id, created_at, updated_at FROM notes WHERE id = ?",
                params![id.as_str()],
                Self::parse_note,
            )
            .optional()?;

        Ok(note)
    }

    fn list(&self) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, category_id, created_at, updated_at
             FROM notes
             ORDER BY updated_at DESC, id DESC",
        )?;

        let notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn assign_category(&self, id: &NoteId, category: Option<&CategoryId>) -> Result<Note> {
        let now = chrono::Utc::now().timestamp_millis();

        let result = self.conn.execute(
            "UPDATE notes SET category_id = ?, updated_at = ? WHERE id = ?",
            params![category.map(CategoryId::as_str), now, id.as_str()],
        );

        let rows = match result {
            Ok(rows) => rows,
            Err(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let missing = category.map_or_else(String::new, CategoryId::as_str);
                return Err(Error::NotFound(format!("category {missing}")));
            }
            Err(e) => return Err(e.into()),
        };

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM notes WHERE id LIKE ? || '%' ORDER BY id LIMIT ?",
        )?;

        let ids = stmt
            .query_map(params![prefix, limit as i64], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CategoryRepository, Database, SqliteCategoryRepository};

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let note = repo.create("  Groceries ").unwrap();
        assert_eq!(note.title, "Groceries");

        let fetched = repo.get(&note.id).unwrap().unwrap();
        assert_eq!(fetched, note);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        assert!(matches!(repo.create("  "), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_assign_and_clear_category() {
        let db = setup();
        let notes = SqliteNoteRepository::new(db.connection());
        let categories = SqliteCategoryRepository::new(db.connection());

        let note = notes.create("Standup").unwrap();
        let work = categories.create("Work").unwrap();

        let assigned = notes.assign_category(&note.id, Some(&work.id)).unwrap();
        assert_eq!(assigned.category_id, Some(work.id));

        let cleared = notes.assign_category(&note.id, None).unwrap();
        assert!(cleared.category_id.is_none());
    }

    #[test]
    fn test_assign_unknown_category() {
        let db = setup();
        let notes = SqliteNoteRepository::new(db.connection());

        let note = notes.create("Standup").unwrap();
        let error = notes
            .assign_category(&note.id, Some(&CategoryId::new()))
            .unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[test]
    fn test_assign_unknown_note() {
        let db = setup();
        let notes = SqliteNoteRepository::new(db.connection());

        let error = notes.assign_category(&NoteId::new(), None).unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[test]
    fn test_category_delete_uncategorizes_notes() {
        let db = setup();
        let notes = SqliteNoteRepository::new(db.connection());
        let categories = SqliteCategoryRepository::new(db.connection());

        let note = notes.create("Standup").unwrap();
        let work = categories.create("Work").unwrap();
        notes.assign_category(&note.id, Some(&work.id)).unwrap();

        categories.delete(&work.id).unwrap();

        let fetched = notes.get(&note.id).unwrap().unwrap();
        assert!(fetched.category_id.is_none());
    }

    #[test]
    fn test_list_ids_by_prefix() {
        let db = setup();
        let notes = SqliteNoteRepository::new(db.connection());

        let note = notes.create("One").unwrap();
        notes.create("Two").unwrap();

        let id = note.id.to_string();
        let matches = notes.list_ids_by_prefix(&id[..18], 3).unwrap();
        assert!(matches.contains(&id));

        let all = notes.list_ids_by_prefix("", 10).unwrap();
        assert_eq!(all.len(), 2);
    }
}
