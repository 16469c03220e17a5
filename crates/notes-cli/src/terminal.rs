//! Plain-text rendering of the category list screen.

use notes_core::presenter::{CategoryListView, CategoryRow, DisplayState, RowPatch};
use serde::Serialize;

/// Marker printed before the note's current category
pub const CURRENT_MARKER: &str = "*";

/// A `CategoryListView` that keeps rows in memory and prints them on demand
#[derive(Debug)]
pub struct TerminalView {
    rows: Vec<CategoryRow>,
    state: DisplayState,
    transactions: usize,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            state: DisplayState::Populated,
            transactions: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScreenSnapshot<'a> {
    pub title: &'a str,
    pub display: &'a DisplayState,
    pub rows: &'a [CategoryRow],
}

impl TerminalView {
    pub fn rows(&self) -> &[CategoryRow] {
        &self.rows
    }

    pub const fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Number of patch batches applied since the last reload
    pub const fn transactions(&self) -> usize {
        self.transactions
    }

    /// Screen contents as printable lines
    pub fn render(&self, title: &str) -> Vec<String> {
        let mut lines = vec![title.to_string(), "-".repeat(title.chars().count())];

        match &self.state {
            DisplayState::Empty { message } => lines.push(message.clone()),
            DisplayState::Failed { message } => {
                lines.push(format!("Unable to load categories: {message}"));
            }
            DisplayState::Populated => {
                lines.extend(self.rows.iter().map(|row| {
                    let marker = if row.highlighted { CURRENT_MARKER } else { " " };
                    format!("{marker} {}", row.name)
                }));
            }
        }

        lines
    }

    pub fn snapshot<'a>(&'a self, title: &'a str) -> ScreenSnapshot<'a> {
        let rows: &[CategoryRow] = if self.state.shows_list() {
            &self.rows
        } else {
            &[]
        };
        ScreenSnapshot {
            title,
            display: &self.state,
            rows,
        }
    }
}

impl CategoryListView for TerminalView {
    fn reload(&mut self, rows: &[CategoryRow]) {
        self.rows = rows.to_vec();
        self.transactions = 0;
    }

    fn apply(&mut self, patches: &[RowPatch]) {
        for patch in patches {
            match patch {
                RowPatch::Insert { index, row } => self.rows.insert(*index, row.clone()),
                RowPatch::Delete { index } => {
                    self.rows.remove(*index);
                }
                RowPatch::Reload { index, row } => self.rows[*index] = row.clone(),
                RowPatch::Move { from, to, row } => {
                    self.rows.remove(*from);
                    self.rows.insert(*to, row.clone());
                }
            }
        }
        self.transactions += 1;
    }

    fn show(&mut self, state: &DisplayState) {
        self.state = state.clone();
    }

    fn deselect(&mut self, _index: usize) {}
}
