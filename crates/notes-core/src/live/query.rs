//! Live category query definition

use serde::{Deserialize, Serialize};

/// Which categories a live query selects
///
/// Results are always ordered by name ascending, compared byte-wise (so
/// `"Work"` sorts before `"errands"`), with the record id as a tie-break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuery {
    /// Only names starting with this prefix (case-insensitive)
    pub name_prefix: Option<String>,
}

impl CategoryQuery {
    /// Every category in the store
    #[must_use]
    pub const fn all() -> Self {
        Self { name_prefix: None }
    }

    /// Categories whose name starts with `prefix`
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: Some(prefix.into()),
        }
    }

    /// `LIKE` pattern for the prefix, with `%`, `_` and `\` escaped
    pub fn like_pattern(&self) -> Option<String> {
        let prefix = self.name_prefix.as_deref()?;
        let mut pattern = String::with_capacity(prefix.len() + 1);
        for ch in prefix.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        Some(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_has_no_pattern() {
        assert_eq!(CategoryQuery::all().like_pattern(), None);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        let query = CategoryQuery::with_prefix(r"50%_off\");
        assert_eq!(query.like_pattern().as_deref(), Some(r"50\%\_off\\%"));
    }
}
