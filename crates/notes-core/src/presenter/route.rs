//! Navigation requests emitted by the category list.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::models::Category;
use crate::services::Store;

/// Where the screen asks the navigation stack to go next
#[derive(Debug, Clone)]
pub enum Route {
    /// Leave the category list and return to the previous screen
    Pop,
    /// Show the add-category screen, creating records in `store`
    AddCategory { store: Rc<Store> },
    /// Show the read-only detail screen for `category`
    CategoryDetail { category: Category },
}

impl Route {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pop => "pop",
            Self::AddCategory { .. } => "add-category",
            Self::CategoryDetail { .. } => "category-detail",
        }
    }

    /// Fail with an invariant error unless this is the `expected` route
    pub fn expect_named(self, expected: &str) -> Result<Self> {
        if self.name() == expected {
            Ok(self)
        } else {
            Err(Error::Invariant(format!(
                "unexpected route '{}' (expected '{expected}')",
                self.name()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_named_accepts_matching_route() {
        assert!(matches!(Route::Pop.expect_named("pop"), Ok(Route::Pop)));
    }

    #[test]
    fn expect_named_rejects_other_routes() {
        let category = Category::new("Work").unwrap();
        let error = Route::CategoryDetail { category }
            .expect_named("pop")
            .unwrap_err();
        assert!(error.is_fatal());
        assert!(error.to_string().contains("category-detail"));
    }
}
