pub mod category;
pub mod common;
pub mod completions;
pub mod note;
