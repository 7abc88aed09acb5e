//! Row-predicate filtering.

use arrow::array::BooleanBuilder;
use arrow::compute::filter_record_batch;
use framepipe_result::Result;

use crate::pipeline::Stage;
use crate::row::Row;
use crate::value::{expect_table, Value};

/// A caller-supplied row predicate.
pub type RowPredicate = Box<dyn Fn(&Row<'_>) -> Result<bool> + Send + Sync>;

/// Keep rows for which every predicate returns true.
///
/// Predicates combine with logical AND. Every predicate is evaluated for
/// every row (no short-circuiting), so side conditions like absent-column
/// errors surface deterministically. Surviving rows keep their relative
/// order.
pub fn filter(predicates: Vec<RowPredicate>) -> Stage {
    Stage::new("filter", move |value| {
        let batch = expect_table(value, "filter")?;
        let mut mask = BooleanBuilder::with_capacity(batch.num_rows());
        for index in 0..batch.num_rows() {
            let row = Row::new(&batch, index);
            let mut keep = true;
            for predicate in &predicates {
                if !predicate(&row)? {
                    keep = false;
                }
            }
            mask.append_value(keep);
        }
        let filtered = filter_record_batch(&batch, &mask.finish())?;
        Ok(Value::Table(filtered))
    })
}
