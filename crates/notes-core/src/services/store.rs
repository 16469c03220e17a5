//! Category/note store with live query support.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use tokio::sync::mpsc::UnboundedSender;

use crate::db::{
    CategoryRepository, Database, NoteRepository, SqliteCategoryRepository, SqliteNoteRepository,
};
use crate::live::{diff_snapshots, CategoryQuery, ChangeBatch, Subscription};
use crate::models::{Category, CategoryId, Note, NoteId};
use crate::Result;

/// An open live query and the last result delivered to it
struct LiveQuery {
    id: u64,
    query: CategoryQuery,
    snapshot: Vec<Category>,
    sender: UnboundedSender<ChangeBatch>,
}

/// Persistence scope for categories and notes.
///
/// Single-threaded: share it with `Rc`. Every committed category mutation
/// re-evaluates the open live queries and queues the differences before the
/// mutating call returns.
pub struct Store {
    db: Database,
    db_path: Option<PathBuf>,
    live: RefCell<Vec<LiveQuery>>,
    next_subscription: Cell<u64>,
}

impl Store {
    /// Open a store backed by the database file at `db_path`.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let db = Database::open(&db_path)?;
        Ok(Self::from_database(db, Some(db_path)))
    }

    /// Open an in-memory store (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::from_database(db, None))
    }

    fn from_database(db: Database, db_path: Option<PathBuf>) -> Self {
        Self {
            db,
            db_path,
            live: RefCell::new(Vec::new()),
            next_subscription: Cell::new(1),
        }
    }

    /// Database file backing this store, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Raw connection. Writes through it bypass live-query publication.
    #[cfg(test)]
    pub(crate) const fn connection(&self) -> &rusqlite::Connection {
        self.db.connection()
    }

    fn categories(&self) -> SqliteCategoryRepository<'_> {
        SqliteCategoryRepository::new(self.db.connection())
    }

    fn notes(&self) -> SqliteNoteRepository<'_> {
        SqliteNoteRepository::new(self.db.connection())
    }

    /// Attach `note` to this store so screens can resolve its scope.
    pub fn bind_note(self: &Rc<Self>, note: Note) -> NoteHandle {
        NoteHandle {
            note,
            store: Rc::downgrade(self),
        }
    }

    // Categories

    pub fn create_category(&self, name: &str) -> Result<Category> {
        let category = self.categories().create(name)?;
        tracing::debug!(id = %category.id, name = %category.name, "Created category");
        self.publish();
        Ok(category)
    }

    pub fn rename_category(&self, id: &CategoryId, name: &str) -> Result<Category> {
        let category = self.categories().rename(id, name)?;
        self.publish();
        Ok(category)
    }

    /// Delete a category. Notes filed under it become uncategorized.
    pub fn delete_category(&self, id: &CategoryId) -> Result<()> {
        self.categories().delete(id)?;
        tracing::debug!(id = %id, "Deleted category");
        self.publish();
        Ok(())
    }

    pub fn get_category(&self, id: &CategoryId) -> Result<Option<Category>> {
        self.categories().get(id)
    }

    pub fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.categories().find_by_name(name)
    }

    pub fn list_categories(&self, query: &CategoryQuery) -> Result<Vec<Category>> {
        self.categories().list(query)
    }

    // Notes

    pub fn create_note(&self, title: &str) -> Result<Note> {
        self.notes().create(title)
    }

    pub fn get_note(&self, id: &NoteId) -> Result<Option<Note>> {
        self.notes().get(id)
    }

    pub fn list_notes(&self) -> Result<Vec<Note>> {
        self.notes().list()
    }

    pub fn list_note_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        self.notes().list_ids_by_prefix(prefix, limit)
    }

    /// File a note under `category`, or clear it with `None`.
    pub fn assign_category(&self, note_id: &NoteId, category: Option<&CategoryId>) -> Result<Note> {
        let note = self.notes().assign_category(note_id, category)?;
        tracing::debug!(note = %note_id, category = ?note.category_id, "Assigned category");
        Ok(note)
    }

    // Live queries

    /// Start a live query.
    ///
    /// Returns the current result set and a subscription that receives one
    /// batch per later mutation that changes it.
    pub fn subscribe(&self, query: CategoryQuery) -> Result<(Vec<Category>, Subscription)> {
        let snapshot = self.categories().list(&query)?;

        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);

        let (sender, subscription) = Subscription::channel(id);
        self.live.borrow_mut().push(LiveQuery {
            id,
            query,
            snapshot: snapshot.clone(),
            sender,
        });
        tracing::debug!(subscription = id, rows = snapshot.len(), "Opened live category query");

        Ok((snapshot, subscription))
    }

    /// Number of live queries whose subscriber is still listening.
    pub fn live_query_count(&self) -> usize {
        self.live
            .borrow()
            .iter()
            .filter(|entry| !entry.sender.is_closed())
            .count()
    }

    /// Re-run every open live query and queue the differences.
    fn publish(&self) {
        let mut live = self.live.borrow_mut();
        live.retain(|entry| {
            let open = !entry.sender.is_closed();
            if !open {
                tracing::debug!(subscription = entry.id, "Dropped closed live category query");
            }
            open
        });

        let categories = self.categories();
        for entry in live.iter_mut() {
            let snapshot = match categories.list(&entry.query) {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    // Keep the old snapshot; the next publish catches up.
                    tracing::error!(subscription = entry.id, "Failed to refresh live query: {error}");
                    continue;
                }
            };

            let events = diff_snapshots(&entry.snapshot, &snapshot);
            entry.snapshot = snapshot;
            if events.is_empty() {
                continue;
            }

            tracing::debug!(
                subscription = entry.id,
                events = events.len(),
                "Publishing category changes"
            );
            if entry.sender.send(ChangeBatch { events }).is_err() {
                tracing::debug!(subscription = entry.id, "Live query subscriber went away");
            }
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("db_path", &self.db_path)
            .field("live_queries", &self.live.borrow().len())
            .finish_non_exhaustive()
    }
}

/// A note together with the store it lives in.
///
/// The store is held weakly; once every strong `Rc<Store>` is gone the handle
/// no longer resolves a store.
#[derive(Debug, Clone)]
pub struct NoteHandle {
    note: Note,
    store: Weak<Store>,
}

impl NoteHandle {
    /// A handle with no store behind it.
    pub const fn detached(note: Note) -> Self {
        Self {
            note,
            store: Weak::new(),
        }
    }

    pub const fn note(&self) -> &Note {
        &self.note
    }

    /// The note's store, if it is still open.
    pub fn store(&self) -> Option<Rc<Store>> {
        self.store.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::{apply_diff, ChangeEvent};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn setup() -> Rc<Store> {
        Rc::new(Store::open_in_memory().unwrap())
    }

    fn names(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn subscribe_returns_sorted_snapshot() {
        let store = setup();
        store.create_category("Work").unwrap();
        store.create_category("Home").unwrap();

        let (snapshot, _subscription) = store.subscribe(CategoryQuery::all()).unwrap();
        assert_eq!(names(&snapshot), vec!["Home", "Work"]);
    }

    #[test]
    fn mutations_queue_one_batch_each() {
        let store = setup();
        let (mut rows, mut subscription) = store.subscribe(CategoryQuery::all()).unwrap();

        let work = store.create_category("Work").unwrap();
        store.create_category("Home").unwrap();
        store.rename_category(&work.id, "Errands").unwrap();
        store.delete_category(&work.id).unwrap();

        let batches = subscription.drain();
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|batch| batch.len() == 1));

        for batch in &batches {
            rows = batch.events.iter().try_fold(rows, apply_diff).unwrap();
        }
        assert_eq!(names(&rows), vec!["Home"]);
        assert_eq!(rows, store.list_categories(&CategoryQuery::all()).unwrap());
    }

    #[test]
    fn rename_that_reorders_folds_to_store_order() {
        let store = setup();
        let apple = store.create_category("Apple").unwrap();
        store.create_category("Home").unwrap();
        store.create_category("Work").unwrap();

        let (rows, mut subscription) = store.subscribe(CategoryQuery::all()).unwrap();
        store.rename_category(&apple.id, "Zebra").unwrap();

        let batch = subscription.try_next().unwrap();
        assert!(batch
            .events
            .iter()
            .any(|event| matches!(event, ChangeEvent::Move { .. })));
        let rows = batch.events.iter().try_fold(rows, apply_diff).unwrap();
        assert_eq!(names(&rows), vec!["Home", "Work", "Zebra"]);
        assert!(subscription.try_next().is_none());
    }

    #[test]
    fn prefix_query_ignores_unrelated_changes() {
        let store = setup();
        let (_, mut subscription) = store.subscribe(CategoryQuery::with_prefix("wo")).unwrap();

        store.create_category("Home").unwrap();
        assert!(subscription.try_next().is_none());

        store.create_category("Workouts").unwrap();
        let batch = subscription.try_next().unwrap();
        assert!(matches!(
            &batch.events[..],
            [ChangeEvent::Insert { index: 0, .. }]
        ));
    }

    #[test]
    fn failed_mutation_publishes_nothing() {
        let store = setup();
        store.create_category("Work").unwrap();
        let (_, mut subscription) = store.subscribe(CategoryQuery::all()).unwrap();

        assert!(store.create_category("   ").is_err());
        assert!(store.rename_category(&CategoryId::new(), "Home").is_err());
        assert!(store.delete_category(&CategoryId::new()).is_err());
        assert!(subscription.try_next().is_none());
    }

    #[test]
    fn dropped_subscriptions_are_forgotten() {
        let store = setup();
        let (_, first) = store.subscribe(CategoryQuery::all()).unwrap();
        let (_, mut second) = store.subscribe(CategoryQuery::all()).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(store.live_query_count(), 2);

        drop(first);
        assert_eq!(store.live_query_count(), 1);

        second.close();
        store.create_category("Work").unwrap();
        assert_eq!(store.live_query_count(), 0);
        assert_eq!(store.live.borrow().len(), 0);
    }

    #[test]
    fn note_handle_resolves_store_while_open() {
        let store = setup();
        let note = store.create_note("Standup").unwrap();
        let handle = store.bind_note(note.clone());

        assert_eq!(handle.note(), &note);
        assert!(handle.store().is_some());

        drop(store);
        assert!(handle.store().is_none());
        assert!(NoteHandle::detached(note).store().is_none());
    }

    #[test]
    fn deleting_assigned_category_clears_note() {
        let store = setup();
        let note = store.create_note("Standup").unwrap();
        let work = store.create_category("Work").unwrap();
        store.assign_category(&note.id, Some(&work.id)).unwrap();

        store.delete_category(&work.id).unwrap();

        let note = store.get_note(&note.id).unwrap().unwrap();
        assert!(note.category_id.is_none());
    }

    #[test]
    fn open_path_persists_between_opens() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("notes.db");

        {
            let store = Store::open_path(&db_path).unwrap();
            assert_eq!(store.path(), Some(db_path.as_path()));
            store.create_category("Work").unwrap();
        }

        let store = Store::open_path(&db_path).unwrap();
        let categories = store.list_categories(&CategoryQuery::all()).unwrap();
        assert_eq!(names(&categories), vec!["Work"]);
    }
}
