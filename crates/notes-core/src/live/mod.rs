//! Live queries over the category collection
//!
//! A live query pairs a [`CategoryQuery`] with a [`Subscription`]. The store
//! re-evaluates every open query after each committed mutation and delivers
//! the difference as a [`ChangeBatch`].

mod diff;
mod query;
mod subscription;

pub use diff::{apply_diff, diff_snapshots, ChangeBatch, ChangeEvent};
pub use query::CategoryQuery;
pub use subscription::Subscription;
