//! First-occurrence row deduplication.

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::Schema;
use framepipe_result::{Error, Result};
use rustc_hash::FxHashSet;

use crate::key::{key_columns, GroupKey};
use crate::pipeline::Stage;
use crate::value::{expect_table, Value};

/// Deduplicate rows by the values of `columns`.
///
/// An empty `columns` slice means whole-row deduplication over every column.
/// The first occurrence of each key (in original row order) is kept; later
/// duplicates drop. With `keep_all` false the output carries exactly the key
/// columns, in the order given; with `keep_all` true every original column is
/// retained. Null key values compare equal to each other.
pub fn distinct(columns: &[&str], keep_all: bool) -> Stage {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    Stage::new("distinct", move |value| {
        let batch = expect_table(value, "distinct")?;
        let names: Vec<String> = if columns.is_empty() {
            batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect()
        } else {
            columns.clone()
        };
        let key_arrays = key_columns(&batch, &names)?;

        let mut seen: FxHashSet<GroupKey> = FxHashSet::default();
        let mut keep: Vec<u32> = Vec::new();
        for row in 0..batch.num_rows() {
            let key = GroupKey::from_row(&key_arrays, row)?;
            if seen.insert(key) {
                keep.push(row as u32);
            }
        }
        let indices = UInt32Array::from(keep);

        let base = if keep_all {
            batch
        } else {
            let schema = batch.schema();
            let mut fields = Vec::with_capacity(names.len());
            let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len());
            for name in &names {
                let (idx, field) = schema
                    .column_with_name(name)
                    .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
                fields.push(field.clone());
                arrays.push(batch.column(idx).clone());
            }
            RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?
        };
        let arrays = base
            .columns()
            .iter()
            .map(|column| take(column, &indices, None))
            .collect::<Result<Vec<ArrayRef>, _>>()?;
        let deduped = RecordBatch::try_new(base.schema(), arrays)?;
        Ok(Value::Table(deduped))
    })
}
