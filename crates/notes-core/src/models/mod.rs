//! Data models for Notes

mod category;
mod id;
mod note;

pub use category::{normalize_category_name, Category, CategoryId, MAX_CATEGORY_NAME_LEN};
pub use note::{Note, NoteId};
