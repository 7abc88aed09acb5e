//! The value kinds a pipeline threads between stages.

use arrow::array::{ArrayRef, RecordBatch};
use framepipe_result::{Error, Result};

use crate::scalar::Scalar;

/// A table partitioned by the distinct key tuples of its grouping columns.
///
/// Produced only by `group_by` and consumed only by `summarize`. The partition
/// is a pure re-indexing: row indices are bucketed per key tuple, in first-
/// occurrence order, and no per-group data is materialized until aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    pub(crate) batch: RecordBatch,
    pub(crate) keys: Vec<String>,
    pub(crate) groups: Vec<Vec<u32>>,
}

impl GroupedTable {
    /// The underlying (unreduced) table.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Names of the grouping columns.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of distinct key tuples.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// A single-axis value produced by `squeeze`.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// The sole column of a one-column table.
    Column { name: String, values: ArrayRef },
    /// The sole row of a one-row table, as `(column name, value)` pairs.
    Row(Vec<(String, Scalar)>),
}

/// What flows through a pipeline: a table, a grouped table, or a series.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Table(RecordBatch),
    Grouped(GroupedTable),
    Series(Series),
}

impl Value {
    /// Unwrap a table, or fail if a grouped table or series flowed here.
    pub fn into_table(self) -> Result<RecordBatch> {
        match self {
            Value::Table(batch) => Ok(batch),
            Value::Grouped(_) => Err(Error::InvalidArgument(
                "expected a table value but found a grouped table".into(),
            )),
            Value::Series(_) => Err(Error::InvalidArgument(
                "expected a table value but found a series".into(),
            )),
        }
    }

    /// Unwrap a series, or fail for the other value kinds.
    pub fn into_series(self) -> Result<Series> {
        match self {
            Value::Series(series) => Ok(series),
            _ => Err(Error::InvalidArgument("expected a series value".into())),
        }
    }

    /// Row count of the value, where one is defined.
    pub fn row_count(&self) -> Option<usize> {
        match self {
            Value::Table(batch) => Some(batch.num_rows()),
            Value::Grouped(grouped) => Some(grouped.batch.num_rows()),
            Value::Series(Series::Column { values, .. }) => Some(values.len()),
            Value::Series(Series::Row(_)) => Some(1),
        }
    }
}

impl From<RecordBatch> for Value {
    fn from(batch: RecordBatch) -> Self {
        Value::Table(batch)
    }
}

impl From<GroupedTable> for Value {
    fn from(grouped: GroupedTable) -> Self {
        Value::Grouped(grouped)
    }
}

/// Unwrap a table input for `stage`, with the stage name in the error.
pub(crate) fn expect_table(value: Value, stage: &str) -> Result<RecordBatch> {
    match value {
        Value::Table(batch) => Ok(batch),
        Value::Grouped(_) => Err(Error::InvalidArgument(format!(
            "{stage} expects a table input but received a grouped table"
        ))),
        Value::Series(_) => Err(Error::InvalidArgument(format!(
            "{stage} expects a table input but received a series"
        ))),
    }
}
