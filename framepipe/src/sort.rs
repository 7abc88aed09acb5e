//! Stable multi-key sorting.

use std::cmp::Ordering;

use arrow::array::{ArrayRef, RecordBatch, UInt32Array};
use arrow::compute::take;
use framepipe_expr::SortSpec;
use framepipe_result::Result;

use crate::key::key_columns;
use crate::pipeline::Stage;
use crate::scalar::Scalar;
use crate::value::{expect_table, Value};

/// Sort rows by one or more `"col"` / `"col desc"` directives.
///
/// The first directive is the primary key. The sort is stable: rows that
/// compare equal on every key keep their original relative order. Nulls order
/// first on ascending keys and last on descending ones.
pub fn arrange(directives: &[&str]) -> Stage {
    let directives: Vec<String> = directives.iter().map(|d| d.to_string()).collect();
    Stage::new("arrange", move |value| {
        let batch = expect_table(value, "arrange")?;
        let specs = directives
            .iter()
            .map(|d| SortSpec::parse(d))
            .collect::<Result<Vec<_>>>()?;
        let names: Vec<String> = specs.iter().map(|s| s.column.clone()).collect();
        let columns = key_columns(&batch, &names)?;

        // Materialize the key tuples once, then stably sort row indices.
        let mut keys: Vec<Vec<Scalar>> = Vec::with_capacity(columns.len());
        for column in &columns {
            let mut values = Vec::with_capacity(batch.num_rows());
            for row in 0..batch.num_rows() {
                values.push(Scalar::from_array(column, row)?);
            }
            keys.push(values);
        }

        let mut indices: Vec<u32> = (0..batch.num_rows() as u32).collect();
        indices.sort_by(|&a, &b| {
            for (key, spec) in keys.iter().zip(&specs) {
                let ordering = key[a as usize].total_cmp(&key[b as usize]);
                let ordering = if spec.descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let indices = UInt32Array::from(indices);
        let arrays = batch
            .columns()
            .iter()
            .map(|column| take(column, &indices, None))
            .collect::<Result<Vec<ArrayRef>, _>>()?;
        let sorted = RecordBatch::try_new(batch.schema(), arrays)?;
        Ok(Value::Table(sorted))
    })
}
