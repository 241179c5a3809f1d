//! `DELETE` builder

use super::{Filter, QueryBuilder};
use crate::error::Result;
use crate::executor::Executor;
use crate::statement::Statement;

/// A `DELETE` from one table
///
/// Without predicates every row goes; nothing guards against that.
#[derive(Debug, Clone)]
pub struct Delete {
    table: String,
    query: QueryBuilder,
}

impl Delete {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            query: QueryBuilder::new(),
        }
    }

    pub fn statement(&self) -> Statement {
        self.query.render(&format!("DELETE FROM {}", self.table), &[])
    }

    /// Runs the delete, returning the number of affected rows
    pub async fn fulfil<E: Executor>(self, executor: &E) -> Result<u64> {
        Ok(executor.execute(&self.statement()).await?.rows_affected)
    }
}

impl Filter for Delete {
    fn query(&mut self) -> &mut QueryBuilder {
        &mut self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_delete_with_predicates() {
        let stmt = Delete::new("sessions")
            .where_op("expires_at", crate::Cmp::Lt, "2024-01-01")
            .or_null("user_id")
            .statement();
        assert_eq!(stmt.sql, "DELETE FROM sessions WHERE expires_at < ? OR user_id IS NULL");
        assert_eq!(stmt.params, vec![Value::from("2024-01-01")]);
    }

    #[test]
    fn test_delete_everything() {
        assert_eq!(Delete::new("cache").statement().sql, "DELETE FROM cache");
    }
}
