//! Borrowed row views handed to caller-supplied predicates and transforms.

use arrow::array::RecordBatch;
use framepipe_result::{Error, Result};

use crate::scalar::Scalar;

/// A single row of a table, addressable by column name.
///
/// `Row` borrows the batch it came from; it is only valid for the duration of
/// the predicate or transform call it is handed to. Column names resolve
/// against the batch the enclosing stage received, so columns created by
/// earlier pipeline stages are visible.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    batch: &'a RecordBatch,
    index: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn new(batch: &'a RecordBatch, index: usize) -> Self {
        Self { batch, index }
    }

    /// Position of this row in the table the stage received.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Fetch the value in `column`, or `ColumnNotFound` if it is absent.
    pub fn get(&self, column: &str) -> Result<Scalar> {
        let schema = self.batch.schema();
        let (idx, _) = schema
            .column_with_name(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        Scalar::from_array(self.batch.column(idx), self.index)
    }

    /// Fetch an integer cell. Nulls and non-integer values are errors.
    pub fn i64(&self, column: &str) -> Result<i64> {
        let value = self.get(column)?;
        value.as_i64().ok_or_else(|| {
            Error::InvalidArgument(format!("column {column:?} value {value:?} is not an integer"))
        })
    }

    /// Fetch a numeric cell as f64; integer columns widen.
    pub fn f64(&self, column: &str) -> Result<f64> {
        let value = self.get(column)?;
        value.as_f64().ok_or_else(|| {
            Error::InvalidArgument(format!("column {column:?} value {value:?} is not numeric"))
        })
    }

    /// Fetch a string cell.
    pub fn utf8(&self, column: &str) -> Result<String> {
        match self.get(column)? {
            Scalar::Utf8(value) => Ok(value),
            other => Err(Error::InvalidArgument(format!(
                "column {column:?} value {other:?} is not a string"
            ))),
        }
    }

    /// Fetch a boolean cell.
    pub fn bool(&self, column: &str) -> Result<bool> {
        let value = self.get(column)?;
        value.as_bool().ok_or_else(|| {
            Error::InvalidArgument(format!("column {column:?} value {value:?} is not a boolean"))
        })
    }
}
