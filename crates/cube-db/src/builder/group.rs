//! Nested condition groups and subqueries
//!
//! A group is built inside a callback and closed explicitly. Closing renders
//! the group to a [`Fragment`] which the parent splices in as `( … )`, together
//! with the group's bound values in order.

use super::{column_list, Filter, QueryBuilder};
use crate::error::{QueryError, Result};
use crate::value::Value;

/// Rendered group body and its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    /// `(a = ? OR b = ?)`: no leading keyword
    Condition,
    /// `(SELECT … WHERE …)`: needs a `select()` head
    Subquery,
}

/// Builder handed to group callbacks
///
/// # Examples
///
/// ```
/// use cube_db::{col, select, Filter};
///
/// let stmt = select("users", ["id"])
///     .where_exists(|sub| {
///         Ok(sub.select("orders", ["1"]).where_("orders.user_id", col("users.id")))
///     })
///     .unwrap()
///     .statement();
///
/// assert_eq!(
///     stmt.sql,
///     "SELECT id FROM users WHERE EXISTS (SELECT 1 FROM orders WHERE orders.user_id = users.id)"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryGroup {
    kind: GroupKind,
    head: Option<String>,
    query: QueryBuilder,
}

impl QueryGroup {
    pub(crate) fn condition() -> Self {
        Self {
            kind: GroupKind::Condition,
            head: None,
            query: QueryBuilder::condition_group(),
        }
    }

    pub(crate) fn subquery() -> Self {
        Self {
            kind: GroupKind::Subquery,
            head: None,
            query: QueryBuilder::new(),
        }
    }

    /// Sets the `SELECT … FROM …` head of a subquery
    pub fn select<I, S>(mut self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.head = Some(format!("SELECT {} FROM {}", column_list(columns), table));
        self
    }

    /// Renders the group for splicing into its parent
    pub fn close(self) -> Result<Fragment> {
        match (self.kind, &self.head) {
            (GroupKind::Condition, Some(_)) => {
                return Err(QueryError::invalid("select() is only valid in a subquery group"));
            }
            (GroupKind::Condition, None) if self.query.is_empty() => {
                return Err(QueryError::invalid("condition group has no predicates"));
            }
            (GroupKind::Subquery, None) => {
                return Err(QueryError::invalid("subquery group has no select()"));
            }
            _ => {}
        }

        let statement = self.query.render(self.head.as_deref().unwrap_or(""), &[]);
        Ok(Fragment {
            sql: statement.sql,
            params: statement.params,
        })
    }
}

impl Filter for QueryGroup {
    fn query(&mut self) -> &mut QueryBuilder {
        &mut self.query
    }
}
