//! Incremental change events for live category results.
//!
//! Positions in a batch are sequential: each event's indices are valid
//! against the rows produced by applying every earlier event of the same
//! batch. Folding a batch with [`apply_diff`] over the previous snapshot
//! therefore yields the next snapshot.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Category, CategoryId};

/// A single change to an ordered result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangeEvent {
    /// A category entered the result set at `index`
    Insert { index: usize, category: Category },
    /// The row at `index` left the result set
    Delete { index: usize },
    /// The row at `index` changed but kept its position
    Update { index: usize, category: Category },
    /// The row at `from` moved to `to` (and may carry new content)
    Move {
        from: usize,
        to: usize,
        category: Category,
    },
}

/// Events produced by one committed store mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeBatch {
    pub events: Vec<ChangeEvent>,
}

impl ChangeBatch {
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Apply one change event to the current rows
///
/// Positions outside the current rows mean the event stream and the rows
/// have diverged, which is reported as an invariant error.
pub fn apply_diff(mut rows: Vec<Category>, event: &ChangeEvent) -> Result<Vec<Category>> {
    match event {
        ChangeEvent::Insert { index, category } => {
            check_index(*index, rows.len() + 1, "insert")?;
            rows.insert(*index, category.clone());
        }
        ChangeEvent::Delete { index } => {
            check_index(*index, rows.len(), "delete")?;
            rows.remove(*index);
        }
        ChangeEvent::Update { index, category } => {
            check_index(*index, rows.len(), "update")?;
            rows[*index] = category.clone();
        }
        ChangeEvent::Move { from, to, category } => {
            check_index(*from, rows.len(), "move source")?;
            check_index(*to, rows.len(), "move target")?;
            rows.remove(*from);
            rows.insert(*to, category.clone());
        }
    }
    Ok(rows)
}

fn check_index(index: usize, bound: usize, what: &str) -> Result<()> {
    if index < bound {
        Ok(())
    } else {
        Err(Error::Invariant(format!(
            "{what} position {index} out of range for {bound} rows"
        )))
    }
}

/// Compute the events that turn `old` into `new`
///
/// Rows are matched by record id. Removed rows are deleted from the bottom
/// up, then the new order is walked top-down emitting inserts, moves and
/// in-place updates.
pub fn diff_snapshots(old: &[Category], new: &[Category]) -> Vec<ChangeEvent> {
    let new_ids: HashSet<CategoryId> = new.iter().map(|category| category.id).collect();
    let mut events = Vec::new();
    let mut current = old.to_vec();

    for index in (0..current.len()).rev() {
        if !new_ids.contains(&current[index].id) {
            current.remove(index);
            events.push(ChangeEvent::Delete { index });
        }
    }

    for (index, category) in new.iter().enumerate() {
        // Rows before `index` already match `new`
        let found = current[index..]
            .iter()
            .position(|row| row.id == category.id)
            .map(|offset| offset + index);

        match found {
            Some(position) if position == index => {
                if current[index] != *category {
                    current[index] = category.clone();
                    events.push(ChangeEvent::Update {
                        index,
                        category: category.clone(),
                    });
                }
            }
            Some(position) => {
                current.remove(position);
                current.insert(index, category.clone());
                events.push(ChangeEvent::Move {
                    from: position,
                    to: index,
                    category: category.clone(),
                });
            }
            None => {
                current.insert(index, category.clone());
                events.push(ChangeEvent::Insert {
                    index,
                    category: category.clone(),
                });
            }
        }
    }

    events
}
