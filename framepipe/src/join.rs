//! Hash-based left outer and anti joins against a fixed right table.
//!
//! Both builders capture the right table at construction time and treat it as
//! read-only. Execution follows the usual two phases: build a hash index over
//! the right side's key tuples, then probe it with the left rows in order so
//! the output preserves left row order. A key tuple containing null never
//! matches the right side.

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{Field, Schema};
use framepipe_result::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::key::{key_columns, GroupKey};
use crate::pipeline::Stage;
use crate::value::{expect_table, Value};

/// Left outer join against `right` on the equally-named columns `by`.
///
/// Every left row appears in the output. An unmatched left row emits one row
/// with the right side's non-key columns null; a left row with several right
/// matches multiplies, with matches in right-table order. Right non-key
/// columns whose name collides with a left column are suffixed `_right`.
pub fn left_join(right: RecordBatch, by: &[&str]) -> Stage {
    let by: Vec<String> = by.iter().map(|c| c.to_string()).collect();
    Stage::new("left_join", move |value| {
        let left = expect_table(value, "left_join")?;
        let left_keys = resolve_keys(&left, &by, "left")?;
        let right_keys = resolve_keys(&right, &by, "right")?;

        // Build phase: index right rows by key tuple.
        let mut index: FxHashMap<GroupKey, Vec<u32>> = FxHashMap::default();
        for row in 0..right.num_rows() {
            let key = GroupKey::from_row(&right_keys, row)?;
            if key.has_null() {
                continue;
            }
            index.entry(key).or_default().push(row as u32);
        }

        // Probe phase: walk left rows in order.
        let mut left_indices: Vec<u32> = Vec::with_capacity(left.num_rows());
        let mut right_indices: Vec<Option<u32>> = Vec::with_capacity(left.num_rows());
        for row in 0..left.num_rows() {
            let key = GroupKey::from_row(&left_keys, row)?;
            let matches = if key.has_null() {
                None
            } else {
                index.get(&key).filter(|rows| !rows.is_empty())
            };
            match matches {
                Some(rows) => {
                    for &right_row in rows {
                        left_indices.push(row as u32);
                        right_indices.push(Some(right_row));
                    }
                }
                None => {
                    left_indices.push(row as u32);
                    right_indices.push(None);
                }
            }
        }

        let left_take = UInt32Array::from(left_indices);
        // Null indices yield null cells, which fills unmatched right columns.
        let right_take = UInt32Array::from(right_indices);

        let left_schema = left.schema();
        let mut fields: Vec<Field> = left_schema
            .fields()
            .iter()
            .map(|field| field.as_ref().clone())
            .collect();
        let mut arrays: Vec<ArrayRef> = left
            .columns()
            .iter()
            .map(|column| take(column, &left_take, None))
            .collect::<Result<_, _>>()?;

        let right_schema = right.schema();
        for (idx, field) in right_schema.fields().iter().enumerate() {
            if by.contains(field.name()) {
                continue;
            }
            let name = if left_schema.column_with_name(field.name()).is_some() {
                format!("{}_right", field.name())
            } else {
                field.name().clone()
            };
            fields.push(Field::new(&name, field.data_type().clone(), true));
            arrays.push(take(right.column(idx), &right_take, None)?);
        }

        let joined = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Value::Table(joined))
    })
}

/// Keep left rows whose `by` key tuple does not appear anywhere in `right`.
///
/// The output carries exactly the left columns. Left rows whose key tuple
/// contains null are kept, since a null key matches nothing.
pub fn anti_join(right: RecordBatch, by: &[&str]) -> Stage {
    let by: Vec<String> = by.iter().map(|c| c.to_string()).collect();
    Stage::new("anti_join", move |value| {
        let left = expect_table(value, "anti_join")?;
        let left_keys = resolve_keys(&left, &by, "left")?;
        let right_keys = resolve_keys(&right, &by, "right")?;

        let mut present: FxHashSet<GroupKey> = FxHashSet::default();
        for row in 0..right.num_rows() {
            let key = GroupKey::from_row(&right_keys, row)?;
            if !key.has_null() {
                present.insert(key);
            }
        }

        let mut keep: Vec<u32> = Vec::new();
        for row in 0..left.num_rows() {
            let key = GroupKey::from_row(&left_keys, row)?;
            if key.has_null() || !present.contains(&key) {
                keep.push(row as u32);
            }
        }
        let indices = UInt32Array::from(keep);
        let arrays = left
            .columns()
            .iter()
            .map(|column| take(column, &indices, None))
            .collect::<Result<Vec<ArrayRef>, _>>()?;
        let filtered = RecordBatch::try_new(left.schema(), arrays)?;
        Ok(Value::Table(filtered))
    })
}

fn resolve_keys(batch: &RecordBatch, by: &[String], side: &str) -> Result<Vec<ArrayRef>> {
    key_columns(batch, by).map_err(|err| match err {
        Error::ColumnNotFound(name) => {
            Error::ColumnNotFound(format!("{name} (missing from {side} table)"))
        }
        other => other,
    })
}
