//! # Cube DB
//!
//! A fluent SQL statement builder over sqlx's `Any` driver:
//! - `SELECT`/`UPDATE`/`DELETE`/`INSERT`/`REPLACE` builders
//! - Chainable predicates through the [`Filter`] trait
//! - Nested condition groups and subqueries (`EXISTS`, `IN (SELECT …)`)
//! - Automatic `updated_at` stamping on updates
//! - Table blueprints rendered to SQLite, PostgreSQL or MySQL DDL
//!
//! Builders are pure: they only produce a [`Statement`] (SQL with `?`
//! placeholders plus values). Terminal methods hand that statement to an
//! [`Executor`], normally a [`Database`].
//!
//! ## Example
//!
//! ```
//! use cube_db::{select, Filter, Value};
//!
//! let stmt = select("users", ["id", "name"])
//!     .where_("active", true)
//!     .where_in("role", ["admin", "editor"])
//!     .unwrap()
//!     .statement();
//!
//! assert_eq!(stmt.sql, "SELECT id, name FROM users WHERE active = ? AND role IN (?, ?)");
//! assert_eq!(stmt.params.len(), 3);
//! ```
//!
//! Identifiers (tables, columns, operators in raw fragments) are inlined
//! verbatim and must never come from untrusted input. Values are always bound,
//! except numbers in `IN` lists, which are rendered as literals.

pub mod builder;
pub mod database;
pub mod error;
pub mod executor;
pub mod row;
pub mod schema;
pub mod statement;
pub mod table;
pub mod value;

pub use builder::{Delete, Filter, Fragment, Insert, QueryBuilder, QueryGroup, Replace, Select, Update};
pub use database::{Database, DatabaseConfig, DatabaseType};
pub use error::{QueryError, Result};
pub use executor::{ExecResult, Executor};
pub use row::{FromRow, Row};
pub use schema::{Blueprint, ColumnType};
pub use statement::{Cmp, Direction, Statement};
pub use table::Table;
pub use value::{col, ColumnRef, Operand, Value};

/// `SELECT columns FROM table`; an empty column list selects `*`
pub fn select<I, S>(table: &str, columns: I) -> Select
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Select::new(table, columns)
}

/// `UPDATE table SET …`, stamping `updated_at`
///
/// Use [`Table::without_timestamps`] for tables that have no such column.
pub fn update<I, K, V>(table: &str, values: I) -> Result<Update>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Table::new(table).update(values)
}

pub fn delete(table: &str) -> Delete {
    Delete::new(table)
}

pub fn insert<I, K, V>(table: &str, values: I) -> Result<Insert>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Insert::new(table, values)
}

pub fn replace<I, K, V>(table: &str, values: I) -> Result<Replace>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Replace::new(table, values)
}
