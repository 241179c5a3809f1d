//! `SELECT` builder and its terminal operations

use std::marker::PhantomData;

use super::{column_list, Filter, QueryBuilder};
use crate::error::{QueryError, Result};
use crate::executor::Executor;
use crate::row::{FromRow, Row};
use crate::statement::Statement;
use crate::value::Value;

/// A `SELECT` over one table, yielding `M` per row
///
/// Joins are fragments like any other and must be added before the first
/// predicate to land in the right place.
///
/// # Examples
///
/// ```
/// use cube_db::{select, Filter, Value};
///
/// let stmt = select("users", ["id", "name"]).where_("id", 5).statement();
/// assert_eq!(stmt.sql, "SELECT id, name FROM users WHERE id = ?");
/// assert_eq!(stmt.params, vec![Value::Int(5)]);
/// ```
#[derive(Debug)]
pub struct Select<M = Row> {
    table: String,
    columns: String,
    query: QueryBuilder,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for Select<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            columns: self.columns.clone(),
            query: self.query.clone(),
            _model: PhantomData,
        }
    }
}

impl Select<Row> {
    pub fn new<I, S>(table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            table: table.to_string(),
            columns: column_list(columns),
            query: QueryBuilder::new(),
            _model: PhantomData,
        }
    }
}

impl<M> Select<M> {
    pub fn table(&self) -> &str {
        &self.table
    }

    /// `INNER JOIN table ON left = right`
    pub fn join(mut self, table: &str, left: &str, right: &str) -> Self {
        self.query.push(format!("INNER JOIN {} ON {} = {}", table, left, right));
        self
    }

    /// `LEFT JOIN table ON left = right`
    pub fn left_join(mut self, table: &str, left: &str, right: &str) -> Self {
        self.query.push(format!("LEFT JOIN {} ON {} = {}", table, left, right));
        self
    }

    /// Maps fetched rows onto `T` instead of [`Row`]
    pub fn wrap<T: FromRow>(self) -> Select<T> {
        Select {
            table: self.table,
            columns: self.columns,
            query: self.query,
            _model: PhantomData,
        }
    }

    /// The statement as built so far, without any `LIMIT`
    pub fn statement(&self) -> Statement {
        self.query
            .render(&format!("SELECT {} FROM {}", self.columns, self.table), &[])
    }

    /// Statement with `LIMIT` and optional `OFFSET` appended
    pub fn limited(&self, offset: Option<u64>, limit: u64) -> Statement {
        let mut statement = self.statement();
        statement.sql.push_str(&format!(" LIMIT {}", limit));
        if let Some(offset) = offset {
            statement.sql.push_str(&format!(" OFFSET {}", offset));
        }
        statement
    }

    /// `COUNT(*)` over the same predicates
    ///
    /// A grouped select is counted as a derived table, so the result is the
    /// number of groups rather than the size of the first one.
    pub fn count_statement(&self) -> Statement {
        if !self.query.is_grouped() {
            return self
                .query
                .render(&format!("SELECT COUNT(*) AS aggregate FROM {}", self.table), &[]);
        }

        let inner = self.statement();
        Statement::new(
            format!("SELECT COUNT(*) AS aggregate FROM ({}) AS grouped", inner.sql),
            inner.params,
        )
    }
}

impl<M: FromRow> Select<M> {
    /// First `limit` rows
    pub async fn fetch<E: Executor>(self, executor: &E, limit: u64) -> Result<Vec<M>> {
        map_rows(executor.fetch_rows(&self.limited(None, limit)).await?)
    }

    /// `limit` rows after skipping `offset`
    pub async fn fetch_range<E: Executor>(
        self,
        executor: &E,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<M>> {
        map_rows(executor.fetch_rows(&self.limited(Some(offset), limit)).await?)
    }

    pub async fn fetch_all<E: Executor>(self, executor: &E) -> Result<Vec<M>> {
        map_rows(executor.fetch_rows(&self.statement()).await?)
    }

    /// First row of the unlimited statement, if any
    pub async fn fetch_one<E: Executor>(self, executor: &E) -> Result<Option<M>> {
        let rows = executor.fetch_rows(&self.statement()).await?;
        rows.into_iter().next().map(M::from_row).transpose()
    }

    /// `COUNT(*)` over the same table and predicates
    pub async fn count<E: Executor>(self, executor: &E) -> Result<i64> {
        let rows = executor.fetch_rows(&self.count_statement()).await?;
        let value = rows
            .first()
            .and_then(|row| row.values().first())
            .ok_or_else(|| QueryError::Decode("count returned no rows".to_string()))?;

        match value {
            Value::Int(n) => Ok(*n),
            Value::Float(f) => Ok(*f as i64),
            Value::Text(s) => s
                .parse()
                .map_err(|_| QueryError::Decode(format!("count returned `{}`", s))),
            other => Err(QueryError::Decode(format!("count returned {:?}", other))),
        }
    }
}

fn map_rows<M: FromRow>(rows: Vec<Row>) -> Result<Vec<M>> {
    rows.into_iter().map(M::from_row).collect()
}

impl<M> Filter for Select<M> {
    fn query(&mut self) -> &mut QueryBuilder {
        &mut self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cmp, Direction};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_star() {
        let stmt = Select::new("users", Vec::<&str>::new()).statement();
        assert_eq!(stmt.sql, "SELECT * FROM users");
    }

    #[test]
    fn test_join_before_where() {
        let stmt = Select::new("users", ["users.id", "orders.total"])
            .join("orders", "orders.user_id", "users.id")
            .where_op("orders.total", Cmp::Ge, 10)
            .order_by("orders.total", Direction::Desc)
            .statement();
        assert_eq!(
            stmt.sql,
            "SELECT users.id, orders.total FROM users INNER JOIN orders ON orders.user_id = users.id \
             WHERE orders.total >= ? ORDER BY orders.total DESC"
        );
    }

    #[test]
    fn test_limited() {
        let select = Select::new("posts", ["id"]).where_("published", true);
        assert_eq!(
            select.limited(None, 10).sql,
            "SELECT id FROM posts WHERE published = ? LIMIT 10"
        );
        assert_eq!(
            select.limited(Some(20), 10).sql,
            "SELECT id FROM posts WHERE published = ? LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_count_statement_keeps_predicates() {
        let stmt = Select::new("users", ["id", "name"])
            .where_not_null("email")
            .count_statement();
        assert_eq!(stmt.sql, "SELECT COUNT(*) AS aggregate FROM users WHERE email IS NOT NULL");
    }

    #[test]
    fn test_count_statement_wraps_grouped_select() {
        let stmt = Select::new("users", ["team"])
            .where_("active", true)
            .group_by("team")
            .having("COUNT(*)", Cmp::Gt, 2)
            .count_statement();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS aggregate FROM (SELECT team FROM users WHERE active = ? \
             GROUP BY team HAVING COUNT(*) > ?) AS grouped"
        );
        assert_eq!(stmt.params, vec![Value::Bool(true), Value::Int(2)]);
    }

    #[test]
    fn test_call_order_is_preserved() {
        let stmt = Select::new("t", ["a"])
            .order_by("a", Direction::Asc)
            .where_("a", 1)
            .statement();
        assert_eq!(stmt.sql, "SELECT a FROM t ORDER BY a ASC WHERE a = ?");
    }
}
