//! Screen logic for the note's category picker.
//!
//! The presenter owns no widgets. It talks to a [`CategoryListView`] for
//! rendering and returns [`Route`] values for navigation, so any front-end
//! (terminal, desktop, mobile) can host it.

mod categories;
mod route;
mod view;

pub use categories::CategoryListPresenter;
pub use route::Route;
pub use view::{CategoryListView, CategoryRow, DisplayState, RowPatch};
