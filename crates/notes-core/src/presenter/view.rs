//! What the category list presenter asks of a list view.

use serde::Serialize;

use crate::models::CategoryId;

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    /// `#RRGGBB` text color
    pub color: String,
    /// Whether this is the note's current category
    pub highlighted: bool,
}

/// A row mutation inside one visual transaction
///
/// Indices follow the same sequential rule as change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowPatch {
    Insert { index: usize, row: CategoryRow },
    Delete { index: usize },
    Reload { index: usize, row: CategoryRow },
    Move { from: usize, to: usize, row: CategoryRow },
}

/// Which of the mutually exclusive screen states is visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DisplayState {
    /// No categories: placeholder shown, list hidden
    Empty { message: String },
    /// List shown, placeholder hidden
    Populated,
    /// The live query could not run: error shown, list hidden
    Failed { message: String },
}

impl DisplayState {
    pub const fn shows_list(&self) -> bool {
        matches!(self, Self::Populated)
    }
}

/// Rendering surface driven by the presenter
pub trait CategoryListView {
    /// Replace every row
    fn reload(&mut self, rows: &[CategoryRow]);

    /// Apply one batch of row patches as a single transaction
    fn apply(&mut self, patches: &[RowPatch]);

    /// Show one display state, hiding the others
    fn show(&mut self, state: &DisplayState);

    /// Clear the selection highlight of a tapped row
    fn deselect(&mut self, index: usize);
}
