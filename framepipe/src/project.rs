//! Column projection and renaming stages.

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch};
use arrow::datatypes::{Field, Schema};
use framepipe_expr::RenameSpec;
use framepipe_result::Error;
use rustc_hash::FxHashMap;

use crate::pipeline::Stage;
use crate::value::{expect_table, Value};

/// Project the table down to exactly `columns`, in the order given.
///
/// Output column order follows the argument order, which may differ from the
/// source order. Any absent name fails the stage with `ColumnNotFound`.
pub fn select(columns: &[&str]) -> Stage {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    Stage::new("select", move |value| {
        let batch = expect_table(value, "select")?;
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());
        for name in &columns {
            let (idx, field) = schema
                .column_with_name(name)
                .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
            fields.push(field.clone());
            arrays.push(batch.column(idx).clone());
        }
        let projected = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Value::Table(projected))
    })
}

/// Rename columns according to `"old_name = new_name"` mappings.
///
/// Unmapped columns pass through unchanged. A mapping that does not match the
/// grammar fails with `Parse`; a mapping whose `old_name` is absent fails with
/// `ColumnNotFound`.
pub fn rename(mappings: &[&str]) -> Stage {
    let mappings: Vec<String> = mappings.iter().map(|m| m.to_string()).collect();
    Stage::new("rename", move |value| {
        let batch = expect_table(value, "rename")?;
        let schema = batch.schema();
        let mut name_map: FxHashMap<String, String> = FxHashMap::default();
        for mapping in &mappings {
            let spec = RenameSpec::parse(mapping)?;
            if schema.column_with_name(&spec.old_name).is_none() {
                return Err(Error::ColumnNotFound(spec.old_name));
            }
            name_map.insert(spec.old_name, spec.new_name);
        }
        let fields: Vec<Field> = schema
            .fields()
            .iter()
            .map(|field| match name_map.get(field.name()) {
                Some(new_name) => field.as_ref().clone().with_name(new_name),
                None => field.as_ref().clone(),
            })
            .collect();
        let renamed = RecordBatch::try_new(Arc::new(Schema::new(fields)), batch.columns().to_vec())?;
        Ok(Value::Table(renamed))
    })
}
