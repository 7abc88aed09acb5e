//! Row-level scalar values extracted from Arrow columns.

use std::cmp::Ordering;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array,
    Int64Array, LargeStringArray, StringArray, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use framepipe_result::{Error, Result};

/// A single cell value, as seen by row-level predicates and transforms.
///
/// Arrow integer columns narrower than 64 bits widen to [`Scalar::Int64`] and
/// `Float32` widens to [`Scalar::Float64`], so callers match on five variants
/// regardless of the column's physical type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Extract the value at `row` from `array`.
    pub fn from_array(array: &ArrayRef, row: usize) -> Result<Self> {
        if array.is_null(row) {
            return Ok(Scalar::Null);
        }
        let scalar = match array.data_type() {
            DataType::Boolean => {
                let values = array.as_any().downcast_ref::<BooleanArray>().unwrap();
                Scalar::Bool(values.value(row))
            }
            DataType::Int8 => {
                let values = array.as_any().downcast_ref::<Int8Array>().unwrap();
                Scalar::Int64(i64::from(values.value(row)))
            }
            DataType::Int16 => {
                let values = array.as_any().downcast_ref::<Int16Array>().unwrap();
                Scalar::Int64(i64::from(values.value(row)))
            }
            DataType::Int32 => {
                let values = array.as_any().downcast_ref::<Int32Array>().unwrap();
                Scalar::Int64(i64::from(values.value(row)))
            }
            DataType::Int64 => {
                let values = array.as_any().downcast_ref::<Int64Array>().unwrap();
                Scalar::Int64(values.value(row))
            }
            DataType::UInt8 => {
                let values = array.as_any().downcast_ref::<UInt8Array>().unwrap();
                Scalar::Int64(i64::from(values.value(row)))
            }
            DataType::UInt16 => {
                let values = array.as_any().downcast_ref::<UInt16Array>().unwrap();
                Scalar::Int64(i64::from(values.value(row)))
            }
            DataType::UInt32 => {
                let values = array.as_any().downcast_ref::<UInt32Array>().unwrap();
                Scalar::Int64(i64::from(values.value(row)))
            }
            DataType::UInt64 => {
                let values = array.as_any().downcast_ref::<UInt64Array>().unwrap();
                let value = i64::try_from(values.value(row)).map_err(|_| {
                    Error::InvalidArgument(format!(
                        "uint64 value {} exceeds i64 range",
                        values.value(row)
                    ))
                })?;
                Scalar::Int64(value)
            }
            DataType::Float32 => {
                let values = array.as_any().downcast_ref::<Float32Array>().unwrap();
                Scalar::Float64(f64::from(values.value(row)))
            }
            DataType::Float64 => {
                let values = array.as_any().downcast_ref::<Float64Array>().unwrap();
                Scalar::Float64(values.value(row))
            }
            DataType::Utf8 => {
                let values = array.as_any().downcast_ref::<StringArray>().unwrap();
                Scalar::Utf8(values.value(row).to_string())
            }
            DataType::LargeUtf8 => {
                let values = array.as_any().downcast_ref::<LargeStringArray>().unwrap();
                Scalar::Utf8(values.value(row).to_string())
            }
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unsupported column type {other} for row-level access"
                )));
            }
        };
        Ok(scalar)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view: integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Utf8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Total ordering used by the sort and min/max paths.
    ///
    /// Nulls order first. Integers and floats compare numerically; values of
    /// otherwise unrelated variants fall back to a fixed variant rank so the
    /// ordering stays total.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => Ordering::Equal,
            (Scalar::Null, _) => Ordering::Less,
            (_, Scalar::Null) => Ordering::Greater,
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int64(a), Scalar::Int64(b)) => a.cmp(b),
            (Scalar::Float64(a), Scalar::Float64(b)) => a.total_cmp(b),
            (Scalar::Int64(a), Scalar::Float64(b)) => (*a as f64).total_cmp(b),
            (Scalar::Float64(a), Scalar::Int64(b)) => a.total_cmp(&(*b as f64)),
            (Scalar::Utf8(a), Scalar::Utf8(b)) => a.cmp(b),
            (a, b) => a.variant_rank().cmp(&b.variant_rank()),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::Int64(_) | Scalar::Float64(_) => 2,
            Scalar::Utf8(_) => 3,
        }
    }
}
