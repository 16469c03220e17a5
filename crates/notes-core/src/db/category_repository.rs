//! Category repository implementation

use crate::error::{Error, Result};
use crate::live::CategoryQuery;
use crate::models::{normalize_category_name, Category, CategoryId};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for category storage operations
pub trait CategoryRepository {
    /// Create a new category
    fn create(&self, name: &str) -> Result<Category>;

    /// Get a category by ID
    fn get(&self, id: &CategoryId) -> Result<Option<Category>>;

    /// Find a category by name, ignoring case
    ///
    /// Names need not be unique. An exact-case match wins, then the oldest
    /// record.
    fn find_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// List categories matching `query`, ordered by name
    fn list(&self, query: &CategoryQuery) -> Result<Vec<Category>>;

    /// Rename a category
    fn rename(&self, id: &CategoryId, name: &str) -> Result<Category>;

    /// Delete a category; notes filed under it become uncategorized
    fn delete(&self, id: &CategoryId) -> Result<()>;
}

/// `SQLite` implementation of `CategoryRepository`
pub struct SqliteCategoryRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCategoryRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a category from a database row
    fn parse_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
        let id: String = row.get(0)?;
        let id = id.parse::<CategoryId>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(error))
        })?;
        Ok(Category {
            id,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create(&self, name: &str) -> Result<Category> {
        let category = Category::new(name)?;

        self.conn.execute(
            "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![
                category.id.as_str(),
                category.name,
                category.created_at,
                category.updated_at
            ],
        )?;

        Ok(category)
    }

    fn get(&self, id: &CategoryId) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM categories WHERE id = ?",
                params![id.as_str()],
                Self::parse_category,
            )
            .optional()?;

        Ok(category)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM categories
                 WHERE name = ?1 COLLATE NOCASE
                 ORDER BY name = ?1 DESC, created_at ASC, id ASC
                 LIMIT 1",
                params![name.trim()],
                Self::parse_category,
            )
            .optional()?;

        Ok(category)
    }

    fn list(&self, query: &CategoryQuery) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM categories
             WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\'
             ORDER BY name ASC, id ASC",
        )?;

        let categories = stmt
            .query_map(params![query.like_pattern()], Self::parse_category)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(categories)
    }

    fn rename(&self, id: &CategoryId, name: &str) -> Result<Category> {
        let name = normalize_category_name(name)?;
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE categories SET name = ?, updated_at = ? WHERE id = ?",
            params![name, now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn delete(&self, id: &CategoryId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn names(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let category = repo.create("Work").unwrap();
        let fetched = repo.get(&category.id).unwrap().unwrap();
        assert_eq!(fetched, category);
    }

    #[test]
    fn test_list_sorted_by_name_case_sensitive() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        repo.create("Work").unwrap();
        repo.create("errands").unwrap();
        repo.create("Home").unwrap();

        let all = repo.list(&CategoryQuery::all()).unwrap();
        assert_eq!(names(&all), vec!["Home", "Work", "errands"]);
    }

    #[test]
    fn test_list_orders_duplicate_names_by_id() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let first = repo.create("Work").unwrap();
        let second = repo.create("Work").unwrap();

        let all = repo.list(&CategoryQuery::all()).unwrap();
        let mut expected = vec![first.id.as_str(), second.id.as_str()];
        expected.sort();
        let ids = all.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_list_with_prefix() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        repo.create("Work").unwrap();
        repo.create("Workouts").unwrap();
        repo.create("Home").unwrap();
        repo.create("100%_done").unwrap();

        let work = repo.list(&CategoryQuery::with_prefix("wo")).unwrap();
        assert_eq!(names(&work), vec!["Work", "Workouts"]);

        // Wildcards in the prefix match literally
        let literal = repo.list(&CategoryQuery::with_prefix("100%_")).unwrap();
        assert_eq!(names(&literal), vec!["100%_done"]);
        assert!(repo
            .list(&CategoryQuery::with_prefix("%"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_create_duplicate_names_allowed() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let work = repo.create("Work").unwrap();
        let shouting = repo.create("WORK").unwrap();
        assert_ne!(work.id, shouting.id);
        assert_eq!(repo.list(&CategoryQuery::all()).unwrap().len(), 2);
    }

    #[test]
    fn test_find_by_name() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let home = repo.create("Home").unwrap();
        assert_eq!(repo.find_by_name(" home ").unwrap(), Some(home.clone()));
        assert_eq!(repo.find_by_name("Garden").unwrap(), None);

        let lower = repo.create("home").unwrap();
        assert_eq!(repo.find_by_name("home").unwrap(), Some(lower));
        assert_eq!(repo.find_by_name("Home").unwrap(), Some(home));
    }

    #[test]
    fn test_rename() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let category = repo.create("Wrok").unwrap();
        let renamed = repo.rename(&category.id, "Work").unwrap();
        assert_eq!(renamed.id, category.id);
        assert_eq!(renamed.name, "Work");
        assert!(renamed.updated_at >= category.updated_at);
    }

    #[test]
    fn test_rename_missing() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let error = repo.rename(&CategoryId::new(), "Work").unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[test]
    fn test_delete() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());

        let category = repo.create("Work").unwrap();
        repo.delete(&category.id).unwrap();

        assert!(repo.get(&category.id).unwrap().is_none());
        assert!(matches!(
            repo.delete(&category.id),
            Err(Error::NotFound(_))
        ));
    }
}
