use std::io;
use thiserror::Error;

/// Unified error type for all framepipe operations.
///
/// Every failure mode in the stack maps to one variant here, from malformed
/// directive strings at the API surface down to Arrow kernel failures. Errors
/// propagate upward with the `?` operator; the pipeline runner aborts on the
/// first error it sees and performs no rollback, so a failed run may leave a
/// partially transformed table behind (the in-place contract of the mutate
/// stages is documented on those builders).
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced column is absent from the table state a stage received.
    ///
    /// Column names resolve at stage execution time, not construction time,
    /// so this can also mean an upstream stage dropped or renamed the column
    /// the failing stage expected.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A mini-syntax directive string did not match its grammar.
    ///
    /// The accepted grammars are exact: `"old = new"` for rename mappings
    /// (single space, equals sign, single space), `"col"` or `"col desc"` for
    /// sort directives, and `"new = func(col)"` for aggregation specs. The
    /// message names the offending string and the expected form.
    #[error("parse error: {0}")]
    Parse(String),

    /// An aggregation spec named a function the engine does not support.
    ///
    /// Supported aggregation functions are `sum`, `mean`, `count`, `min`,
    /// and `max`.
    #[error("unknown aggregation function: {0}")]
    UnknownAggregation(String),

    /// A columnar transform returned a column whose length differs from the
    /// row count of the table it was computed from.
    #[error("column {column:?} has {actual} rows, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// I/O error during CSV export.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow kernel or builder error during columnar operations.
    ///
    /// Arrow is the underlying table engine, so these typically indicate a
    /// data type the kernel cannot handle rather than a bug in the pipeline.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid user input or API parameter.
    ///
    /// Covers misuse that is not a lookup or parse failure: applying
    /// `summarize` to an ungrouped table, a row transform producing mixed
    /// value types, integer aggregation overflow, and similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}
