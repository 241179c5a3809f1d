//! The seam between builders and whatever runs their statements

use std::future::Future;

use crate::error::Result;
use crate::row::Row;
use crate::statement::Statement;

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// Runs rendered statements
///
/// `Database` is the production implementation. Tests can implement this over
/// a recorder to inspect the SQL a builder produced without touching a driver.
pub trait Executor: Send + Sync {
    fn fetch_rows(&self, statement: &Statement) -> impl Future<Output = Result<Vec<Row>>> + Send;

    fn execute(&self, statement: &Statement) -> impl Future<Output = Result<ExecResult>> + Send;
}
