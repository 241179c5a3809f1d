//! Result rows and typed row mapping

use serde::de::DeserializeOwned;

use crate::error::{QueryError, Result};
use crate::value::Value;

/// A fetched row: column names and values in select order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push, handy when assembling rows by hand
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .columns
            .iter()
            .cloned()
            .zip(self.values.iter().map(Value::to_json))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Maps the row onto any `Deserialize` type by column name
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_db::Row;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct User {
    ///     id: i64,
    ///     name: String,
    /// }
    ///
    /// let row = Row::new().with("id", 7).with("name", "Ada");
    /// let user: User = row.deserialize().unwrap();
    /// assert_eq!(user.id, 7);
    /// assert_eq!(user.name, "Ada");
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_json()).map_err(|e| QueryError::Decode(e.to_string()))
    }
}

/// Conversion from a fetched row into a caller type
///
/// Implement this for model structs handed to `Select::wrap`. Types that derive
/// `Deserialize` can delegate to [`Row::deserialize`].
pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row)
    }
}

impl FromRow for serde_json::Value {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_by_column() {
        let row = Row::new().with("id", 1).with("name", "a");
        assert_eq!(row.get("name"), Some(&Value::Text("a".to_string())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_to_json() {
        let row = Row::new().with("id", 1).with("active", true).with("bio", None::<String>);
        assert_eq!(
            row.to_json(),
            serde_json::json!({"id": 1, "active": true, "bio": null})
        );
    }

    #[test]
    fn test_deserialize_type_mismatch_is_decode_error() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Only {
            id: String,
        }

        let row = Row::new().with("id", 1);
        assert!(matches!(row.deserialize::<Only>(), Err(QueryError::Decode(_))));
    }
}
