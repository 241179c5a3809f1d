//! Statement builders
//!
//! Every builder owns a [`QueryBuilder`]: an ordered list of SQL fragments plus
//! the values bound to their placeholders. Predicates, ordering and grouping
//! are appended in call order and nothing is reordered afterwards, so
//! `order_by(..)` followed by `where_(..)` renders exactly that (invalid) SQL.
//!
//! The predicate vocabulary lives on the [`Filter`] trait, shared by `Select`,
//! `Update`, `Delete` and nested [`QueryGroup`]s.

pub mod delete;
pub mod group;
pub mod insert;
pub mod select;
pub mod update;

use crate::error::{QueryError, Result};
use crate::statement::{Cmp, Direction, Statement};
use crate::value::{Operand, Value};

pub use delete::Delete;
pub use group::{Fragment, QueryGroup};
pub use insert::{Insert, Replace};
pub use select::Select;
pub use update::Update;

/// How a predicate joins the ones before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Conj {
    Where,
    And,
    Or,
}

// ============================================================================
// Fragment buffer
// ============================================================================

/// Ordered SQL fragments and their bound values
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    parts: Vec<String>,
    params: Vec<Value>,
    /// Keyword for the first predicate: `WHERE`, or nothing inside a group
    lead: Option<&'static str>,
    has_predicate: bool,
    has_having: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            params: Vec::new(),
            lead: Some("WHERE"),
            has_predicate: false,
            has_having: false,
        }
    }

    pub(crate) fn condition_group() -> Self {
        Self {
            lead: None,
            ..Self::new()
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Joins `head` and every fragment with single spaces
    pub(crate) fn render(&self, head: &str, head_params: &[Value]) -> Statement {
        let sql = std::iter::once(head)
            .chain(self.parts.iter().map(String::as_str))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut params = head_params.to_vec();
        params.extend(self.params.iter().cloned());
        Statement::new(sql, params)
    }

    pub(crate) fn push(&mut self, fragment: impl Into<String>) {
        self.parts.push(fragment.into());
    }

    fn connective(&mut self, conj: Conj) -> Option<&'static str> {
        if !self.has_predicate {
            self.has_predicate = true;
            return self.lead;
        }
        Some(match conj {
            Conj::Or => "OR",
            Conj::Where | Conj::And => "AND",
        })
    }

    fn predicate(&mut self, conj: Conj, body: String) {
        match self.connective(conj) {
            Some(keyword) => self.parts.push(format!("{} {}", keyword, body)),
            None => self.parts.push(body),
        }
    }

    pub(crate) fn compare(&mut self, conj: Conj, field: &str, cmp: Cmp, operand: Operand) {
        let rhs = operand.render(&mut self.params);
        self.predicate(conj, format!("{} {} {}", field, cmp, rhs));
    }

    /// Numbers are inlined, everything else is bound
    pub(crate) fn in_list(
        &mut self,
        conj: Conj,
        field: &str,
        values: Vec<Value>,
        negate: bool,
    ) -> Result<()> {
        if values.is_empty() {
            return Err(QueryError::invalid(format!("IN list for `{}` is empty", field)));
        }

        let items = values
            .into_iter()
            .map(|value| match value.inline_literal() {
                Some(literal) => literal,
                None => {
                    self.params.push(value);
                    "?".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let op = if negate { "NOT IN" } else { "IN" };
        self.predicate(conj, format!("{} {} ({})", field, op, items));
        Ok(())
    }

    pub(crate) fn between(&mut self, conj: Conj, field: &str, values: Vec<Value>) -> Result<()> {
        let [low, high]: [Value; 2] = values.try_into().map_err(|values: Vec<Value>| {
            QueryError::invalid(format!(
                "BETWEEN for `{}` needs exactly 2 values, got {}",
                field,
                values.len()
            ))
        })?;

        self.params.push(low);
        self.params.push(high);
        self.predicate(conj, format!("{} BETWEEN ? AND ?", field));
        Ok(())
    }

    pub(crate) fn null(&mut self, conj: Conj, field: &str, negate: bool) {
        let test = if negate { "IS NOT NULL" } else { "IS NULL" };
        self.predicate(conj, format!("{} {}", field, test));
    }

    /// Appends `prefix (fragment)` as a predicate, taking over the group's values
    pub(crate) fn splice(&mut self, conj: Conj, prefix: &str, fragment: Fragment) {
        let Fragment { sql, params } = fragment;
        self.params.extend(params);
        let body = if prefix.is_empty() {
            format!("({})", sql)
        } else {
            format!("{} ({})", prefix, sql)
        };
        self.predicate(conj, body);
    }

    pub(crate) fn raw_predicate(&mut self, conj: Conj, sql: &str, params: Vec<Value>) {
        self.params.extend(params);
        self.predicate(conj, sql.to_string());
    }

    pub(crate) fn raw(&mut self, sql: &str, params: Vec<Value>) {
        self.params.extend(params);
        self.parts.push(sql.to_string());
    }

    /// Extends a trailing `ORDER BY`/`GROUP BY` list or starts a new clause
    fn list_clause(&mut self, keyword: &str, item: String) {
        match self.parts.last_mut() {
            Some(last) if last.starts_with(keyword) => {
                last.push_str(", ");
                last.push_str(&item);
            }
            _ => self.parts.push(format!("{} {}", keyword, item)),
        }
    }

    pub(crate) fn order_by(&mut self, field: &str, direction: Direction) {
        self.list_clause("ORDER BY", format!("{} {}", field, direction.as_str()));
    }

    pub(crate) fn group_by(&mut self, field: &str) {
        self.list_clause("GROUP BY", field.to_string());
    }

    /// True once a `GROUP BY` or `HAVING` clause is present
    pub(crate) fn is_grouped(&self) -> bool {
        self.has_having || self.parts.iter().any(|p| p.starts_with("GROUP BY"))
    }

    pub(crate) fn having(&mut self, field: &str, cmp: Cmp, operand: Operand) {
        let rhs = operand.render(&mut self.params);
        let keyword = if self.has_having { "AND" } else { "HAVING" };
        self.has_having = true;
        self.parts.push(format!("{} {} {} {}", keyword, field, cmp, rhs));
    }
}

/// `a, b, c`, or `*` when no columns are given
pub(crate) fn column_list<I, S>(columns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let list = columns
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect::<Vec<_>>();

    if list.is_empty() {
        "*".to_string()
    } else {
        list.join(", ")
    }
}

fn collect_values<I, V>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}

fn subquery<F>(f: F) -> Result<Fragment>
where
    F: FnOnce(QueryGroup) -> Result<QueryGroup>,
{
    f(QueryGroup::subquery())?.close()
}

fn condition<F>(f: F) -> Result<Fragment>
where
    F: FnOnce(QueryGroup) -> Result<QueryGroup>,
{
    f(QueryGroup::condition())?.close()
}

// ============================================================================
// Predicate vocabulary
// ============================================================================

/// Chainable predicates shared by every filterable builder
///
/// Methods consume and return the builder. Those that can reject their
/// arguments (`IN` lists, `BETWEEN`, nested groups) return `Result<Self>`.
///
/// The first predicate always renders as `WHERE`, whichever method added it;
/// after that `where_*`/`and_*` join with `AND` and `or_*` with `OR`.
///
/// # Examples
///
/// ```
/// use cube_db::{select, Filter};
///
/// let stmt = select("users", ["id"])
///     .where_("active", true)
///     .or_group(|g| Ok(g.where_("role", "admin").and_where("verified", true)))
///     .unwrap()
///     .statement();
///
/// assert_eq!(
///     stmt.sql,
///     "SELECT id FROM users WHERE active = ? OR (role = ? AND verified = ?)"
/// );
/// assert_eq!(stmt.params.len(), 3);
/// ```
pub trait Filter: Sized {
    /// The fragment buffer predicates are appended to
    fn query(&mut self) -> &mut QueryBuilder;

    fn apply(mut self, f: impl FnOnce(&mut QueryBuilder)) -> Self {
        f(self.query());
        self
    }

    fn try_apply(mut self, f: impl FnOnce(&mut QueryBuilder) -> Result<()>) -> Result<Self> {
        f(self.query())?;
        Ok(self)
    }

    // --- comparisons ---

    fn where_(self, field: &str, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.compare(Conj::Where, field, Cmp::Eq, value.into()))
    }

    fn where_op(self, field: &str, cmp: Cmp, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.compare(Conj::Where, field, cmp, value.into()))
    }

    fn and_where(self, field: &str, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.compare(Conj::And, field, Cmp::Eq, value.into()))
    }

    fn and_where_op(self, field: &str, cmp: Cmp, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.compare(Conj::And, field, cmp, value.into()))
    }

    fn or_where(self, field: &str, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.compare(Conj::Or, field, Cmp::Eq, value.into()))
    }

    fn or_where_op(self, field: &str, cmp: Cmp, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.compare(Conj::Or, field, cmp, value.into()))
    }

    // --- IN lists ---

    fn where_in<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.in_list(Conj::Where, field, collect_values(values), false))
    }

    fn and_in<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.in_list(Conj::And, field, collect_values(values), false))
    }

    fn or_in<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.in_list(Conj::Or, field, collect_values(values), false))
    }

    fn where_not_in<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.in_list(Conj::Where, field, collect_values(values), true))
    }

    fn and_not_in<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.in_list(Conj::And, field, collect_values(values), true))
    }

    fn or_not_in<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.in_list(Conj::Or, field, collect_values(values), true))
    }

    // --- IN subqueries ---

    fn where_in_query<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Where, &format!("{} IN", field), fragment)))
    }

    fn and_in_query<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::And, &format!("{} IN", field), fragment)))
    }

    fn or_in_query<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Or, &format!("{} IN", field), fragment)))
    }

    fn where_not_in_query<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Where, &format!("{} NOT IN", field), fragment)))
    }

    fn and_not_in_query<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::And, &format!("{} NOT IN", field), fragment)))
    }

    fn or_not_in_query<F>(self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Or, &format!("{} NOT IN", field), fragment)))
    }

    // --- BETWEEN / LIKE / NULL ---

    fn where_between<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.between(Conj::Where, field, collect_values(values)))
    }

    fn and_between<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.between(Conj::And, field, collect_values(values)))
    }

    fn or_between<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_apply(|q| q.between(Conj::Or, field, collect_values(values)))
    }

    fn where_like(self, field: &str, pattern: impl Into<Value>) -> Self {
        self.apply(|q| q.compare(Conj::Where, field, Cmp::Like, Operand::Value(pattern.into())))
    }

    fn and_like(self, field: &str, pattern: impl Into<Value>) -> Self {
        self.apply(|q| q.compare(Conj::And, field, Cmp::Like, Operand::Value(pattern.into())))
    }

    fn or_like(self, field: &str, pattern: impl Into<Value>) -> Self {
        self.apply(|q| q.compare(Conj::Or, field, Cmp::Like, Operand::Value(pattern.into())))
    }

    fn where_null(self, field: &str) -> Self {
        self.apply(|q| q.null(Conj::Where, field, false))
    }

    fn and_null(self, field: &str) -> Self {
        self.apply(|q| q.null(Conj::And, field, false))
    }

    fn or_null(self, field: &str) -> Self {
        self.apply(|q| q.null(Conj::Or, field, false))
    }

    fn where_not_null(self, field: &str) -> Self {
        self.apply(|q| q.null(Conj::Where, field, true))
    }

    fn and_not_null(self, field: &str) -> Self {
        self.apply(|q| q.null(Conj::And, field, true))
    }

    fn or_not_null(self, field: &str) -> Self {
        self.apply(|q| q.null(Conj::Or, field, true))
    }

    // --- EXISTS ---

    fn where_exists<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Where, "EXISTS", fragment)))
    }

    fn and_exists<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::And, "EXISTS", fragment)))
    }

    fn or_exists<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Or, "EXISTS", fragment)))
    }

    fn where_not_exists<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Where, "NOT EXISTS", fragment)))
    }

    fn and_not_exists<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::And, "NOT EXISTS", fragment)))
    }

    fn or_not_exists<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = subquery(f)?;
        Ok(self.apply(|q| q.splice(Conj::Or, "NOT EXISTS", fragment)))
    }

    // --- parenthesised groups ---

    fn where_group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = condition(f)?;
        Ok(self.apply(|q| q.splice(Conj::Where, "", fragment)))
    }

    fn and_group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = condition(f)?;
        Ok(self.apply(|q| q.splice(Conj::And, "", fragment)))
    }

    fn or_group<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryGroup) -> Result<QueryGroup>,
    {
        let fragment = condition(f)?;
        Ok(self.apply(|q| q.splice(Conj::Or, "", fragment)))
    }

    // --- raw SQL, ordering, grouping ---

    /// Appends `sql` verbatim with no connective
    fn raw<I, V>(self, sql: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.apply(|q| q.raw(sql, collect_values(params)))
    }

    /// Appends `sql` as a predicate, joined like `where_`
    fn where_raw<I, V>(self, sql: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.apply(|q| q.raw_predicate(Conj::Where, sql, collect_values(params)))
    }

    fn or_where_raw<I, V>(self, sql: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.apply(|q| q.raw_predicate(Conj::Or, sql, collect_values(params)))
    }

    fn order_by(self, field: &str, direction: Direction) -> Self {
        self.apply(|q| q.order_by(field, direction))
    }

    fn group_by(self, field: &str) -> Self {
        self.apply(|q| q.group_by(field))
    }

    fn having(self, field: &str, cmp: Cmp, value: impl Into<Operand>) -> Self {
        self.apply(|q| q.having(field, cmp, value.into()))
    }
}
