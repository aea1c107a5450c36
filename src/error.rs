//! File-level failure taxonomy.
//!
//! Row-level problems (a row too sparse to trust) are recovered where they
//! occur and never surface here. Everything in [`ConvertError`] aborts the
//! current file only; the batch driver routes the raw file to the problem
//! directory and moves on.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// The header-row heuristic exhausted the input without finding a row
    /// that is mostly recognizable.
    #[error("no recognizable header row found in the first {rows_scanned} row(s)")]
    NoHeaderFound { rows_scanned: usize },

    /// The supplier-number column is mandatory; a file without one cannot be
    /// repaired by filling and must go to manual review.
    #[error("required column '{field}' not found in input")]
    MissingRequiredColumn { field: &'static str },

    /// Invariant violation: after filling, the table is still narrower than
    /// the canonical schema.
    #[error("table has {actual} column(s) after filling, schema requires {expected}")]
    SchemaTooNarrow { expected: usize, actual: usize },
}
