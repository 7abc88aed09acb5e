//! Hashable key tuples for grouping, deduplication, and join probing.

use arrow::array::{ArrayRef, RecordBatch};
use framepipe_result::{Error, Result};

use crate::scalar::Scalar;

/// A single key-column value in hashable form.
///
/// Floats are stored as their bit pattern so the type can implement `Eq` and
/// `Hash`. Unlike SQL join semantics, `Null == Null` here: grouping and
/// deduplication treat null keys as one bucket, and the join paths consult
/// [`GroupKey::has_null`] to keep null keys from matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(u64),
    Utf8(String),
}

impl From<Scalar> for KeyValue {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => KeyValue::Null,
            Scalar::Bool(v) => KeyValue::Bool(v),
            Scalar::Int64(v) => KeyValue::Int64(v),
            Scalar::Float64(v) => KeyValue::Float64(v.to_bits()),
            Scalar::Utf8(v) => KeyValue::Utf8(v),
        }
    }
}

/// The key tuple of one row across a set of key columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GroupKey {
    values: Vec<KeyValue>,
}

impl GroupKey {
    pub(crate) fn from_row(columns: &[ArrayRef], row: usize) -> Result<Self> {
        let mut values = Vec::with_capacity(columns.len());
        for column in columns {
            values.push(KeyValue::from(Scalar::from_array(column, row)?));
        }
        Ok(Self { values })
    }

    pub(crate) fn has_null(&self) -> bool {
        self.values.iter().any(|v| matches!(v, KeyValue::Null))
    }
}

/// Resolve `names` to column arrays, failing on the first absent name.
pub(crate) fn key_columns(batch: &RecordBatch, names: &[String]) -> Result<Vec<ArrayRef>> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let (idx, _) = schema
            .column_with_name(name)
            .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
        columns.push(batch.column(idx).clone());
    }
    Ok(columns)
}
