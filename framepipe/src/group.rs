//! Grouping and grouped aggregation.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float64Builder, Int64Builder, RecordBatch, StringBuilder, UInt32Array,
};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, Schema};
use framepipe_expr::{AggregateKind, AggregateSpec};
use framepipe_result::{Error, Result};
use rustc_hash::FxHashMap;

use crate::key::{key_columns, GroupKey};
use crate::pipeline::Stage;
use crate::scalar::Scalar;
use crate::value::{expect_table, GroupedTable, Value};

/// Partition rows by the distinct key tuples of `columns`.
///
/// Pure re-indexing: nothing is reduced or materialized per group. Groups are
/// ordered by the first occurrence of their key tuple; null keys form a
/// single group of their own. The result is consumed by [`summarize`].
pub fn group_by(columns: &[&str]) -> Stage {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    Stage::new("group_by", move |value| {
        let batch = expect_table(value, "group_by")?;
        let key_arrays = key_columns(&batch, &columns)?;
        let mut index: FxHashMap<GroupKey, usize> = FxHashMap::default();
        let mut groups: Vec<Vec<u32>> = Vec::new();
        for row in 0..batch.num_rows() {
            let key = GroupKey::from_row(&key_arrays, row)?;
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(row as u32);
        }
        Ok(Value::Grouped(GroupedTable {
            batch,
            keys: columns.clone(),
            groups,
        }))
    })
}

/// Reduce a grouped table to one row per group.
///
/// Each spec is `"new_column = function_name(source_column)"`. The output
/// carries the grouping-key columns first (taken from each group's first
/// row), then one column per spec. Applying this stage to an ungrouped table
/// is an error.
pub fn summarize(specs: &[&str]) -> Stage {
    let specs: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
    Stage::new("summarize", move |value| {
        let grouped = match value {
            Value::Grouped(grouped) => grouped,
            _ => {
                return Err(Error::InvalidArgument(
                    "summarize expects a grouped table; apply group_by first".into(),
                ));
            }
        };
        let parsed = specs
            .iter()
            .map(|s| AggregateSpec::parse(s))
            .collect::<Result<Vec<_>>>()?;

        let batch = &grouped.batch;
        let schema = batch.schema();
        let first_rows: Vec<u32> = grouped.groups.iter().map(|rows| rows[0]).collect();
        let first_rows = UInt32Array::from(first_rows);

        let mut fields: Vec<Field> = Vec::with_capacity(grouped.keys.len() + parsed.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(grouped.keys.len() + parsed.len());
        for key in &grouped.keys {
            let (idx, field) = schema
                .column_with_name(key)
                .ok_or_else(|| Error::ColumnNotFound(key.clone()))?;
            fields.push(field.clone());
            arrays.push(take(batch.column(idx), &first_rows, None)?);
        }
        for spec in &parsed {
            let (idx, _) = schema
                .column_with_name(&spec.source)
                .ok_or_else(|| Error::ColumnNotFound(spec.source.clone()))?;
            let (field, array) = aggregate_column(spec, batch.column(idx), &grouped.groups)?;
            fields.push(field);
            arrays.push(array);
        }
        let summarized = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Value::Table(summarized))
    })
}

enum SourceKind {
    Int,
    Float,
    Utf8,
}

fn source_kind(spec: &AggregateSpec, data_type: &DataType) -> Result<SourceKind> {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Ok(SourceKind::Int),
        DataType::Float32 | DataType::Float64 => Ok(SourceKind::Float),
        DataType::Utf8 | DataType::LargeUtf8 => Ok(SourceKind::Utf8),
        other => Err(Error::InvalidArgument(format!(
            "cannot aggregate column {:?} of type {other}",
            spec.source
        ))),
    }
}

/// Compute one aggregation spec across all groups.
fn aggregate_column(
    spec: &AggregateSpec,
    column: &ArrayRef,
    groups: &[Vec<u32>],
) -> Result<(Field, ArrayRef)> {
    match spec.kind {
        AggregateKind::Count => {
            // Non-null count; works for any column type.
            let mut builder = Int64Builder::with_capacity(groups.len());
            for rows in groups {
                let count = rows
                    .iter()
                    .filter(|&&row| !column.is_null(row as usize))
                    .count();
                builder.append_value(count as i64);
            }
            Ok((
                Field::new(&spec.alias, DataType::Int64, true),
                Arc::new(builder.finish()),
            ))
        }
        AggregateKind::Sum => match source_kind(spec, column.data_type())? {
            SourceKind::Int => {
                let mut builder = Int64Builder::with_capacity(groups.len());
                for rows in groups {
                    let mut total: i64 = 0;
                    for &row in rows {
                        if let Some(v) = Scalar::from_array(column, row as usize)?.as_i64() {
                            total = total.checked_add(v).ok_or_else(|| {
                                Error::InvalidArgument(format!(
                                    "sum of column {:?} exceeds i64 range",
                                    spec.source
                                ))
                            })?;
                        }
                    }
                    builder.append_value(total);
                }
                Ok((
                    Field::new(&spec.alias, DataType::Int64, true),
                    Arc::new(builder.finish()),
                ))
            }
            SourceKind::Float => {
                let mut builder = Float64Builder::with_capacity(groups.len());
                for rows in groups {
                    let mut total: f64 = 0.0;
                    for &row in rows {
                        if let Some(v) = Scalar::from_array(column, row as usize)?.as_f64() {
                            total += v;
                        }
                    }
                    builder.append_value(total);
                }
                Ok((
                    Field::new(&spec.alias, DataType::Float64, true),
                    Arc::new(builder.finish()),
                ))
            }
            SourceKind::Utf8 => Err(Error::InvalidArgument(format!(
                "cannot sum string column {:?}",
                spec.source
            ))),
        },
        AggregateKind::Mean => {
            match source_kind(spec, column.data_type())? {
                SourceKind::Utf8 => {
                    return Err(Error::InvalidArgument(format!(
                        "cannot take the mean of string column {:?}",
                        spec.source
                    )));
                }
                SourceKind::Int | SourceKind::Float => {}
            }
            let mut builder = Float64Builder::with_capacity(groups.len());
            for rows in groups {
                let mut total: f64 = 0.0;
                let mut count: usize = 0;
                for &row in rows {
                    if let Some(v) = Scalar::from_array(column, row as usize)?.as_f64() {
                        total += v;
                        count += 1;
                    }
                }
                if count == 0 {
                    builder.append_null();
                } else {
                    builder.append_value(total / count as f64);
                }
            }
            Ok((
                Field::new(&spec.alias, DataType::Float64, true),
                Arc::new(builder.finish()),
            ))
        }
        AggregateKind::Min | AggregateKind::Max => {
            let kind = source_kind(spec, column.data_type())?;
            let mut extremes: Vec<Scalar> = Vec::with_capacity(groups.len());
            for rows in groups {
                let mut extreme: Option<Scalar> = None;
                for &row in rows {
                    let scalar = Scalar::from_array(column, row as usize)?;
                    if scalar.is_null() {
                        continue;
                    }
                    extreme = Some(match extreme {
                        None => scalar,
                        Some(current) => {
                            let replace = match spec.kind {
                                AggregateKind::Min => {
                                    scalar.total_cmp(&current) == std::cmp::Ordering::Less
                                }
                                _ => scalar.total_cmp(&current) == std::cmp::Ordering::Greater,
                            };
                            if replace { scalar } else { current }
                        }
                    });
                }
                extremes.push(extreme.unwrap_or(Scalar::Null));
            }
            let (data_type, array): (DataType, ArrayRef) = match kind {
                SourceKind::Int => {
                    let mut builder = Int64Builder::with_capacity(extremes.len());
                    for extreme in &extremes {
                        match extreme.as_i64() {
                            Some(v) => builder.append_value(v),
                            None => builder.append_null(),
                        }
                    }
                    (DataType::Int64, Arc::new(builder.finish()))
                }
                SourceKind::Float => {
                    let mut builder = Float64Builder::with_capacity(extremes.len());
                    for extreme in &extremes {
                        match extreme.as_f64() {
                            Some(v) => builder.append_value(v),
                            None => builder.append_null(),
                        }
                    }
                    (DataType::Float64, Arc::new(builder.finish()))
                }
                SourceKind::Utf8 => {
                    let mut builder = StringBuilder::new();
                    for extreme in &extremes {
                        match extreme.as_str() {
                            Some(v) => builder.append_value(v),
                            None => builder.append_null(),
                        }
                    }
                    (DataType::Utf8, Arc::new(builder.finish()))
                }
            };
            Ok((Field::new(&spec.alias, data_type, true), array))
        }
    }
}
