//! Per-table entry point for the builders

use crate::builder::{Delete, Insert, Replace, Select, Update};
use crate::error::Result;
use crate::value::Value;

/// Column stamped by updates unless a table opts out
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "updated_at";

/// A named table and its update-timestamp policy
///
/// # Examples
///
/// ```
/// use cube_db::{Filter, Table};
///
/// let tags = Table::new("tags").without_timestamps();
/// let stmt = tags.update([("label", "rust")]).unwrap().where_("id", 3).statement();
/// assert_eq!(stmt.sql, "UPDATE tags SET label = ? WHERE id = ?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    timestamp_column: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp_column: Some(DEFAULT_TIMESTAMP_COLUMN.to_string()),
        }
    }

    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = Some(column.into());
        self
    }

    pub fn without_timestamps(mut self) -> Self {
        self.timestamp_column = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp_column(&self) -> Option<&str> {
        self.timestamp_column.as_deref()
    }

    pub fn select<I, S>(&self, columns: I) -> Select
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Select::new(&self.name, columns)
    }

    pub fn update<I, K, V>(&self, values: I) -> Result<Update>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Update::new(&self.name, values, self.timestamp_column())
    }

    pub fn delete(&self) -> Delete {
        Delete::new(&self.name)
    }

    pub fn insert<I, K, V>(&self, values: I) -> Result<Insert>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Insert::new(&self.name, values)
    }

    pub fn replace<I, K, V>(&self, values: I) -> Result<Replace>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Replace::new(&self.name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timestamp_column() {
        let users = Table::new("users");
        assert_eq!(users.timestamp_column(), Some("updated_at"));
        let stmt = users.update([("name", "x")]).unwrap().statement();
        assert_eq!(stmt.sql, "UPDATE users SET name = ?, updated_at = ?");
    }

    #[test]
    fn test_custom_timestamp_column() {
        let posts = Table::new("posts").with_timestamp_column("edited_at");
        let stmt = posts.update([("title", "x")]).unwrap().statement();
        assert_eq!(stmt.sql, "UPDATE posts SET title = ?, edited_at = ?");
    }

    #[test]
    fn test_select_uses_table_name() {
        assert_eq!(Table::new("t").select(["a"]).statement().sql, "SELECT a FROM t");
        assert_eq!(Table::new("t").delete().statement().sql, "DELETE FROM t");
    }
}
