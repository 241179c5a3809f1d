//! `INSERT` and `REPLACE` builders

use crate::error::{QueryError, Result};
use crate::executor::Executor;
use crate::statement::Statement;
use crate::value::Value;

/// Column list and one row of values
#[derive(Debug, Clone)]
struct Assignments {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Assignments {
    fn new<I, K, V>(table: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();

        if columns.is_empty() {
            return Err(QueryError::invalid(format!("insert into `{}` has no columns", table)));
        }

        Ok(Self {
            table: table.to_string(),
            columns,
            values,
        })
    }

    fn statement(&self, verb: &str) -> Statement {
        let placeholders = vec!["?"; self.values.len()].join(", ");
        Statement::new(
            format!(
                "{} INTO {} ({}) VALUES ({})",
                verb,
                self.table,
                self.columns.join(", "),
                placeholders
            ),
            self.values.clone(),
        )
    }
}

/// A single-row `INSERT`
///
/// # Examples
///
/// ```
/// use cube_db::{insert, Value};
///
/// let stmt = insert("users", [("name", Value::from("Ada")), ("age", Value::from(36))])
///     .unwrap()
///     .statement();
/// assert_eq!(stmt.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
/// ```
#[derive(Debug, Clone)]
pub struct Insert {
    row: Assignments,
}

impl Insert {
    pub fn new<I, K, V>(table: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Ok(Self {
            row: Assignments::new(table, values)?,
        })
    }

    pub fn statement(&self) -> Statement {
        self.row.statement("INSERT")
    }

    /// Runs the insert, returning the new row id where the driver reports one
    pub async fn fulfil<E: Executor>(self, executor: &E) -> Result<Option<i64>> {
        Ok(executor.execute(&self.statement()).await?.last_insert_id)
    }
}

/// A single-row `REPLACE` (insert or overwrite by key)
#[derive(Debug, Clone)]
pub struct Replace {
    row: Assignments,
}

impl Replace {
    pub fn new<I, K, V>(table: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Ok(Self {
            row: Assignments::new(table, values)?,
        })
    }

    pub fn statement(&self) -> Statement {
        self.row.statement("REPLACE")
    }

    /// Runs the replace, returning the number of affected rows
    pub async fn fulfil<E: Executor>(self, executor: &E) -> Result<u64> {
        Ok(executor.execute(&self.statement()).await?.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replace_statement() {
        let stmt = Replace::new("settings", [("key", "theme"), ("value", "dark")])
            .unwrap()
            .statement();
        assert_eq!(stmt.sql, "REPLACE INTO settings (key, value) VALUES (?, ?)");
        assert_eq!(stmt.params, vec![Value::from("theme"), Value::from("dark")]);
    }

    #[test]
    fn test_empty_insert_is_rejected() {
        let values: Vec<(String, Value)> = Vec::new();
        assert!(matches!(
            Insert::new("users", values),
            Err(QueryError::InvalidArgument(_))
        ));
    }
}
