//! Row-bounded slicing and single-axis reduction.

use crate::pipeline::Stage;
use crate::scalar::Scalar;
use crate::value::{expect_table, Series, Value};

/// Take the first `n` rows, defaulting to 5.
///
/// A table with fewer rows than requested passes through whole. The differing
/// defaults of `head` (5) and `tail` (6) are an observed contract of the
/// original design and kept as-is.
pub fn head(n: Option<usize>) -> Stage {
    Stage::new("head", move |value| {
        let batch = expect_table(value, "head")?;
        let n = n.unwrap_or(5).min(batch.num_rows());
        Ok(Value::Table(batch.slice(0, n)))
    })
}

/// Take the last `n` rows, defaulting to 6. Row order is preserved.
pub fn tail(n: Option<usize>) -> Stage {
    Stage::new("tail", move |value| {
        let batch = expect_table(value, "tail")?;
        let n = n.unwrap_or(6).min(batch.num_rows());
        Ok(Value::Table(batch.slice(batch.num_rows() - n, n)))
    })
}

/// Reduce a one-column or one-row table to a [`Series`].
///
/// A one-column table (of any height, including 1x1) becomes
/// [`Series::Column`]; otherwise a one-row table becomes [`Series::Row`].
/// Tables with more than one row and more than one column pass through
/// unchanged.
pub fn squeeze() -> Stage {
    Stage::new("squeeze", move |value| {
        let batch = expect_table(value, "squeeze")?;
        if batch.num_columns() == 1 {
            let series = Series::Column {
                name: batch.schema().field(0).name().clone(),
                values: batch.column(0).clone(),
            };
            return Ok(Value::Series(series));
        }
        if batch.num_rows() == 1 && batch.num_columns() > 0 {
            let schema = batch.schema();
            let mut cells = Vec::with_capacity(batch.num_columns());
            for (idx, field) in schema.fields().iter().enumerate() {
                cells.push((field.name().clone(), Scalar::from_array(batch.column(idx), 0)?));
            }
            return Ok(Value::Series(Series::Row(cells)));
        }
        Ok(Value::Table(batch))
    })
}
