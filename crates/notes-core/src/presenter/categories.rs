//! Category list presenter
//!
//! Lists every category in the note's store by name, highlights the one the
//! note is filed under, and keeps the view in step with the store through a
//! live query.

use std::rc::Rc;

use crate::config::PresenterConfig;
use crate::error::{Error, Result};
use crate::live::{apply_diff, CategoryQuery, ChangeBatch, ChangeEvent, Subscription};
use crate::models::{Category, Note};
use crate::services::{NoteHandle, Store};

use super::route::Route;
use super::view::{CategoryListView, CategoryRow, DisplayState, RowPatch};

/// Drives a [`CategoryListView`] for one note.
pub struct CategoryListPresenter<V: CategoryListView> {
    store: Rc<Store>,
    note: Note,
    config: PresenterConfig,
    view: V,
    rows: Vec<Category>,
    subscription: Option<Subscription>,
    load_error: Option<String>,
    state: DisplayState,
}

impl<V: CategoryListView> CategoryListPresenter<V> {
    /// Create a presenter for `note`.
    ///
    /// A note without a reachable store is a wiring bug and fails with
    /// [`Error::Invariant`].
    pub fn new(note: &NoteHandle, config: PresenterConfig, view: V) -> Result<Self> {
        let store = note
            .store()
            .ok_or_else(|| Error::Invariant("no store found for note".to_string()))?;
        let state = DisplayState::Empty {
            message: config.empty_message.clone(),
        };

        Ok(Self {
            store,
            note: note.note().clone(),
            config,
            view,
            rows: Vec::new(),
            subscription: None,
            load_error: None,
            state,
        })
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub const fn note(&self) -> &Note {
        &self.note
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub const fn display_state(&self) -> &DisplayState {
        &self.state
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rendered form of every row, top to bottom
    pub fn rows(&self) -> Vec<CategoryRow> {
        self.rows.iter().map(|category| self.render_row(category)).collect()
    }

    pub fn row(&self, index: usize) -> Result<CategoryRow> {
        self.category_at(index).map(|category| self.render_row(category))
    }

    pub fn category_at(&self, index: usize) -> Result<&Category> {
        self.rows
            .get(index)
            .ok_or_else(|| Error::Invariant(format!("unexpected row index {index}")))
    }

    /// Run the live query and render its first result.
    ///
    /// A failing query is logged and leaves the list empty with the
    /// `Failed` state showing.
    pub fn load(&mut self) {
        self.close();

        match self.store.subscribe(CategoryQuery::all()) {
            Ok((rows, subscription)) => {
                tracing::debug!(rows = rows.len(), "Loaded categories");
                self.rows = rows;
                self.subscription = Some(subscription);
                self.load_error = None;
            }
            Err(error) => {
                tracing::error!("Unable to fetch categories: {error}");
                self.rows.clear();
                self.load_error = Some(error.to_string());
            }
        }

        let rows = self.rows();
        self.view.reload(&rows);
        self.update_view();
    }

    /// Apply every change batch queued since the last call.
    ///
    /// Returns how many batches were applied. If a batch does not fit the
    /// current rows, the remaining batches are discarded and the list is
    /// reloaded from the store before the error is returned.
    pub fn sync(&mut self) -> Result<usize> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(0);
        };

        let batches = subscription.drain();
        for (applied, batch) in batches.iter().enumerate() {
            if let Err(error) = self.apply_batch(batch) {
                tracing::warn!(
                    applied,
                    discarded = batches.len() - applied,
                    "Category list out of step with store, reloading: {error}"
                );
                self.load();
                return Err(error);
            }
        }
        Ok(batches.len())
    }

    /// Apply one batch as a single visual transaction.
    ///
    /// Either every event applies or the rows are left untouched. The display
    /// state is evaluated once, after the whole batch.
    fn apply_batch(&mut self, batch: &ChangeBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut rows = self.rows.clone();
        let mut patches = Vec::with_capacity(batch.len());
        for event in &batch.events {
            rows = apply_diff(rows, event)?;
            patches.push(self.patch_for(event));
        }
        self.rows = rows;

        tracing::debug!(events = batch.len(), rows = self.rows.len(), "Applied category changes");
        self.view.apply(&patches);
        self.update_view();
        Ok(())
    }

    /// File the note under the tapped category and leave the screen.
    pub fn select_row(&mut self, index: usize) -> Result<Route> {
        let category = self.category_at(index)?.clone();
        self.view.deselect(index);

        self.note = self
            .store
            .assign_category(&self.note.id, Some(&category.id))?;
        tracing::info!(note = %self.note.id, category = %category.name, "Selected category");

        Ok(Route::Pop)
    }

    /// Delete the category on the swiped row and bring the list up to date.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        let category = self.category_at(index)?.clone();
        self.store.delete_category(&category.id)?;
        tracing::info!(category = %category.name, "Deleted category");

        // The store may have cleared the note's reference
        self.refresh_note();
        self.sync()?;
        Ok(())
    }

    /// Request the add-category screen for this note's store.
    pub fn add(&self) -> Route {
        Route::AddCategory {
            store: Rc::clone(&self.store),
        }
    }

    /// Request the detail screen for the category on `index`.
    pub fn open_detail(&self, index: usize) -> Result<Route> {
        let category = self.category_at(index)?.clone();
        Ok(Route::CategoryDetail { category })
    }

    /// End the live query.
    pub fn close(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
    }

    fn refresh_note(&mut self) {
        match self.store.get_note(&self.note.id) {
            Ok(Some(note)) => self.note = note,
            Ok(None) => tracing::warn!(note = %self.note.id, "Note disappeared from store"),
            Err(error) => tracing::warn!(note = %self.note.id, "Failed to refresh note: {error}"),
        }
    }

    fn render_row(&self, category: &Category) -> CategoryRow {
        let highlighted = self.note.is_assigned_to(category);
        CategoryRow {
            id: category.id,
            name: category.name.clone(),
            color: self.config.row_color(highlighted).to_string(),
            highlighted,
        }
    }

    fn patch_for(&self, event: &ChangeEvent) -> RowPatch {
        match event {
            ChangeEvent::Insert { index, category } => RowPatch::Insert {
                index: *index,
                row: self.render_row(category),
            },
            ChangeEvent::Delete { index } => RowPatch::Delete { index: *index },
            ChangeEvent::Update { index, category } => RowPatch::Reload {
                index: *index,
                row: self.render_row(category),
            },
            ChangeEvent::Move { from, to, category } => RowPatch::Move {
                from: *from,
                to: *to,
                row: self.render_row(category),
            },
        }
    }

    fn update_view(&mut self) {
        let state = if let Some(message) = &self.load_error {
            DisplayState::Failed {
                message: message.clone(),
            }
        } else if self.rows.is_empty() {
            DisplayState::Empty {
                message: self.config.empty_message.clone(),
            }
        } else {
            DisplayState::Populated
        };

        self.view.show(&state);
        self.state = state;
    }
}

impl<V: CategoryListView> Drop for CategoryListPresenter<V> {
    fn drop(&mut self) {
        self.close();
    }
}
