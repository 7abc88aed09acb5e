//! Column assignment stages: whole-column (`mutate`) and per-row
//! (`mutate_row`) transforms.
//!
//! Both stages assign columns into the table flowing through the pipeline and
//! pass that table on. This is the one deliberate departure from the
//! otherwise-pure stage contract: untouched columns keep their existing
//! allocations, and a failed run may leave earlier assignments visible to the
//! caller. Callers that need an unmodified input must copy upstream.

use std::sync::Arc;

use arrow::array::{
    new_null_array, ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, RecordBatch,
    StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema};
use framepipe_result::{Error, Result};

use crate::pipeline::Stage;
use crate::row::Row;
use crate::scalar::Scalar;
use crate::value::{expect_table, Value};

/// A caller-supplied columnar transform: whole table in, one column out.
pub type ColumnTransform = Box<dyn Fn(&RecordBatch) -> Result<ArrayRef> + Send + Sync>;

/// A caller-supplied row transform: one row in, one cell out.
pub type RowTransform = Box<dyn Fn(&Row<'_>) -> Result<Scalar> + Send + Sync>;

/// Assign columns computed from the whole table, in the order given.
///
/// Each transform sees the table's *current* state, so a later transform in
/// the same call can reference a column assigned by an earlier one. An
/// existing column of the same name is replaced in place; a new name is
/// appended. A transform returning the wrong number of rows fails with
/// `ShapeMismatch`.
pub fn mutate(transformations: Vec<(impl Into<String>, ColumnTransform)>) -> Stage {
    let transformations: Vec<(String, ColumnTransform)> = transformations
        .into_iter()
        .map(|(name, transform)| (name.into(), transform))
        .collect();
    Stage::new("mutate", move |value| {
        let mut batch = expect_table(value, "mutate")?;
        for (name, transform) in &transformations {
            let column = transform(&batch)?;
            if column.len() != batch.num_rows() {
                return Err(Error::ShapeMismatch {
                    column: name.clone(),
                    expected: batch.num_rows(),
                    actual: column.len(),
                });
            }
            batch = assign_column(&batch, name, column)?;
        }
        Ok(Value::Table(batch))
    })
}

/// Assign columns computed one row at a time, in the order given.
///
/// Same contract as [`mutate`], for transforms whose natural shape is
/// `Row -> Scalar` rather than a vectorized column computation. The output
/// column's Arrow type is inferred from the first non-null scalar; a later
/// scalar of a different variant is an error, and an all-null column
/// materializes as nullable `Int64`.
pub fn mutate_row(transformations: Vec<(impl Into<String>, RowTransform)>) -> Stage {
    let transformations: Vec<(String, RowTransform)> = transformations
        .into_iter()
        .map(|(name, transform)| (name.into(), transform))
        .collect();
    Stage::new("mutate_row", move |value| {
        let mut batch = expect_table(value, "mutate_row")?;
        for (name, transform) in &transformations {
            let mut scalars = Vec::with_capacity(batch.num_rows());
            for index in 0..batch.num_rows() {
                let row = Row::new(&batch, index);
                scalars.push(transform(&row)?);
            }
            let column = build_column(name, &scalars)?;
            batch = assign_column(&batch, name, column)?;
        }
        Ok(Value::Table(batch))
    })
}

/// Replace the column named `name`, or append it if absent.
fn assign_column(batch: &RecordBatch, name: &str, column: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| field.as_ref().clone())
        .collect();
    let mut arrays: Vec<ArrayRef> = batch.columns().to_vec();
    let field = Field::new(name, column.data_type().clone(), true);
    match schema.column_with_name(name) {
        Some((idx, _)) => {
            fields[idx] = field;
            arrays[idx] = column;
        }
        None => {
            fields.push(field);
            arrays.push(column);
        }
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Build an Arrow column from row-transform outputs.
fn build_column(name: &str, scalars: &[Scalar]) -> Result<ArrayRef> {
    let mixed = |value: &Scalar| {
        Error::InvalidArgument(format!(
            "row transform for column {name:?} produced mixed value types (saw {value:?})"
        ))
    };
    let first = scalars.iter().find(|s| !s.is_null());
    let column: ArrayRef = match first {
        None => new_null_array(&DataType::Int64, scalars.len()),
        Some(Scalar::Bool(_)) => {
            let mut builder = BooleanBuilder::with_capacity(scalars.len());
            for scalar in scalars {
                match scalar {
                    Scalar::Bool(v) => builder.append_value(*v),
                    Scalar::Null => builder.append_null(),
                    other => return Err(mixed(other)),
                }
            }
            Arc::new(builder.finish())
        }
        Some(Scalar::Int64(_)) => {
            let mut builder = Int64Builder::with_capacity(scalars.len());
            for scalar in scalars {
                match scalar {
                    Scalar::Int64(v) => builder.append_value(*v),
                    Scalar::Null => builder.append_null(),
                    other => return Err(mixed(other)),
                }
            }
            Arc::new(builder.finish())
        }
        Some(Scalar::Float64(_)) => {
            let mut builder = Float64Builder::with_capacity(scalars.len());
            for scalar in scalars {
                match scalar {
                    Scalar::Float64(v) => builder.append_value(*v),
                    Scalar::Null => builder.append_null(),
                    other => return Err(mixed(other)),
                }
            }
            Arc::new(builder.finish())
        }
        Some(Scalar::Utf8(_)) => {
            let mut builder = StringBuilder::new();
            for scalar in scalars {
                match scalar {
                    Scalar::Utf8(v) => builder.append_value(v),
                    Scalar::Null => builder.append_null(),
                    other => return Err(mixed(other)),
                }
            }
            Arc::new(builder.finish())
        }
        Some(Scalar::Null) => unreachable!("find() skips nulls"),
    };
    Ok(column)
}
