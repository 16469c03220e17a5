//! Note model

use serde::{Deserialize, Serialize};

use super::id::record_id;
use super::{Category, CategoryId};

record_id! {
    /// Identity of a note
    NoteId
}

/// A note and the category it is filed under, if any
///
/// The note only points at its category; deleting the category leaves the
/// note in place with `category_id` cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub category_id: Option<CategoryId>,
    /// Unix ms
    pub created_at: i64,
    /// Unix ms; bumped whenever the category assignment changes
    pub updated_at: i64,
}

impl Note {
    /// An uncategorized note stamped with the current time
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let stamp = chrono::Utc::now().timestamp_millis();
        Self {
            id: NoteId::new(),
            title: title.into(),
            category_id: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// Whether the note is filed under `category` (compared by id)
    #[must_use]
    pub fn is_assigned_to(&self, category: &Category) -> bool {
        self.category_id == Some(category.id)
    }

    /// Title text up to the first line break
    #[must_use]
    pub fn headline(&self) -> &str {
        self.title.lines().next().unwrap_or_default()
    }
}
