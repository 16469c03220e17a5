//! Category model

use serde::{Deserialize, Serialize};

use super::id::record_id;
use crate::error::{Error, Result};

/// Longest accepted category name, in characters
pub const MAX_CATEGORY_NAME_LEN: usize = 64;

record_id! {
    /// Identity of a category
    CategoryId
}

/// A named category a note can be filed under
///
/// Identity is the id; the name is only a display and sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,
    /// Display name and sort key; not required to be unique
    pub name: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Category {
    /// Create a new category with the given name
    ///
    /// The name is trimmed and must not be empty.
    pub fn new(name: &str) -> Result<Self> {
        let name = normalize_category_name(name)?;
        let now = chrono::Utc::now().timestamp_millis();
        Ok(Self {
            id: CategoryId::new(),
            name,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Trim a category name and reject empty or oversized names
pub fn normalize_category_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Category name cannot be empty".into()));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "Category name is longer than {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_new_trims_name() {
        let category = Category::new("  Work ").unwrap();
        assert_eq!(category.name, "Work");
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn test_category_new_rejects_blank() {
        assert!(matches!(Category::new(" \t "), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_category_name_length_limit() {
        let long = "x".repeat(MAX_CATEGORY_NAME_LEN + 1);
        assert!(normalize_category_name(&long).is_err());
        assert!(normalize_category_name(&long[1..]).is_ok());
    }
}
