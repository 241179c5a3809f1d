//! `UPDATE` builder

use chrono::Utc;

use super::{Filter, QueryBuilder};
use crate::error::{QueryError, Result};
use crate::executor::Executor;
use crate::statement::Statement;
use crate::value::Value;

/// An `UPDATE` of one table
///
/// When the table keeps a timestamp column (`updated_at` by default), it is set
/// to the current UTC time after the caller's columns, unless the caller already
/// set it.
///
/// # Examples
///
/// ```
/// use cube_db::{update, Cmp, Filter, Value};
///
/// let stmt = update("users", [("name", "Bob")]).unwrap().where_op("id", Cmp::Eq, 5).statement();
/// assert_eq!(stmt.sql, "UPDATE users SET name = ?, updated_at = ? WHERE id = ?");
/// assert_eq!(stmt.params[0], Value::from("Bob"));
/// assert!(matches!(stmt.params[1], Value::Timestamp(_)));
/// assert_eq!(stmt.params[2], Value::Int(5));
/// ```
#[derive(Debug, Clone)]
pub struct Update {
    table: String,
    sets: Vec<(String, Value)>,
    query: QueryBuilder,
}

impl Update {
    pub fn new<I, K, V>(table: &str, values: I, timestamp_column: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut sets = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<Vec<(String, Value)>>();

        if sets.is_empty() {
            return Err(QueryError::invalid(format!("update of `{}` sets no columns", table)));
        }

        if let Some(column) = timestamp_column {
            if !sets.iter().any(|(name, _)| name == column) {
                sets.push((column.to_string(), Value::Timestamp(Utc::now().naive_utc())));
            }
        }

        Ok(Self {
            table: table.to_string(),
            sets,
            query: QueryBuilder::new(),
        })
    }

    pub fn statement(&self) -> Statement {
        let assignments = self
            .sets
            .iter()
            .map(|(name, _)| format!("{} = ?", name))
            .collect::<Vec<_>>()
            .join(", ");
        let values = self.sets.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>();

        self.query
            .render(&format!("UPDATE {} SET {}", self.table, assignments), &values)
    }

    /// Runs the update, returning the number of affected rows
    pub async fn fulfil<E: Executor>(self, executor: &E) -> Result<u64> {
        Ok(executor.execute(&self.statement()).await?.rows_affected)
    }
}

impl Filter for Update {
    fn query(&mut self) -> &mut QueryBuilder {
        &mut self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_without_timestamp_column() {
        let stmt = Update::new("tags", [("label", "rust")], None)
            .unwrap()
            .where_("id", 1)
            .statement();
        assert_eq!(stmt.sql, "UPDATE tags SET label = ? WHERE id = ?");
        assert_eq!(stmt.params, vec![Value::from("rust"), Value::from(1)]);
    }

    #[test]
    fn test_caller_timestamp_wins() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let stmt = Update::new(
            "users",
            [("name", Value::from("A")), ("updated_at", Value::from(ts))],
            Some("updated_at"),
        )
        .unwrap()
        .statement();
        assert_eq!(stmt.sql, "UPDATE users SET name = ?, updated_at = ?");
        assert_eq!(stmt.params[1], Value::Timestamp(ts));
    }

    #[test]
    fn test_custom_timestamp_column() {
        let stmt = Update::new("posts", [("title", "x")], Some("modified"))
            .unwrap()
            .statement();
        assert_eq!(stmt.sql, "UPDATE posts SET title = ?, modified = ?");
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let values: Vec<(&str, Value)> = Vec::new();
        assert!(matches!(
            Update::new("users", values, Some("updated_at")),
            Err(QueryError::InvalidArgument(_))
        ));
    }
}
