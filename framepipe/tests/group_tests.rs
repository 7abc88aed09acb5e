//! Grouping and grouped-aggregation stages.

use arrow::array::{Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use framepipe::{group_by, pipeline, summarize, Error, Value};
use std::sync::Arc;

fn i64_column(batch: &RecordBatch, name: &str) -> Vec<i64> {
    let schema = batch.schema();
    let (idx, _) = schema.column_with_name(name).unwrap();
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap()
        .values()
        .to_vec()
}

fn f64_column(batch: &RecordBatch, name: &str) -> Vec<f64> {
    let schema = batch.schema();
    let (idx, _) = schema.column_with_name(name).unwrap();
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap()
        .values()
        .to_vec()
}

fn ledger_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("k", DataType::Int64, false),
        Field::new("amount", DataType::Int64, false),
        Field::new("who", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 1, 2])),
            Arc::new(Int64Array::from(vec![2, 3, 5])),
            Arc::new(StringArray::from(vec!["ann", "bob", "cal"])),
        ],
    )
    .unwrap()
}

#[test]
fn grouped_sum_per_key() {
    let batch = pipeline(
        ledger_batch(),
        [group_by(&["k"]), summarize(&["total = sum(amount)"])],
    )
    .unwrap()
    .into_table()
    .unwrap();
    assert_eq!(batch.num_rows(), 2);
    // Groups surface in first-occurrence order, key columns first.
    assert_eq!(batch.schema().field(0).name(), "k");
    assert_eq!(i64_column(&batch, "k"), vec![1, 2]);
    assert_eq!(i64_column(&batch, "total"), vec![5, 5]);
}

#[test]
fn multiple_aggregations_in_one_call() {
    let batch = pipeline(
        ledger_batch(),
        [
            group_by(&["k"]),
            summarize(&[
                "total = sum(amount)",
                "avg = mean(amount)",
                "n = count(amount)",
                "low = min(amount)",
                "high = max(amount)",
            ]),
        ],
    )
    .unwrap()
    .into_table()
    .unwrap();
    assert_eq!(i64_column(&batch, "total"), vec![5, 5]);
    assert_eq!(f64_column(&batch, "avg"), vec![2.5, 5.0]);
    assert_eq!(i64_column(&batch, "n"), vec![2, 1]);
    assert_eq!(i64_column(&batch, "low"), vec![2, 5]);
    assert_eq!(i64_column(&batch, "high"), vec![3, 5]);
}

#[test]
fn min_max_work_on_strings() {
    let batch = pipeline(
        ledger_batch(),
        [group_by(&["k"]), summarize(&["first = min(who)"])],
    )
    .unwrap()
    .into_table()
    .unwrap();
    let schema = batch.schema();
    let (idx, _) = schema.column_with_name("first").unwrap();
    let values = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(values.value(0), "ann");
    assert_eq!(values.value(1), "cal");
}

#[test]
fn group_by_is_pure_reindexing() {
    let result = pipeline(ledger_batch(), [group_by(&["k"])]).unwrap();
    match result {
        Value::Grouped(grouped) => {
            assert_eq!(grouped.group_count(), 2);
            assert_eq!(grouped.keys(), &["k".to_string()]);
            // Nothing reduced: the underlying table is intact.
            assert_eq!(grouped.batch(), &ledger_batch());
        }
        other => panic!("expected a grouped table, got {other:?}"),
    }
}

#[test]
fn grouping_on_multiple_columns() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int64, false),
        Field::new("b", DataType::Int64, false),
        Field::new("v", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 1, 1, 2])),
            Arc::new(Int64Array::from(vec![1, 2, 1, 1])),
            Arc::new(Int64Array::from(vec![10, 20, 30, 40])),
        ],
    )
    .unwrap();
    let summarized = pipeline(
        batch,
        [group_by(&["a", "b"]), summarize(&["total = sum(v)"])],
    )
    .unwrap()
    .into_table()
    .unwrap();
    assert_eq!(i64_column(&summarized, "a"), vec![1, 1, 2]);
    assert_eq!(i64_column(&summarized, "b"), vec![1, 2, 1]);
    assert_eq!(i64_column(&summarized, "total"), vec![40, 20, 40]);
}

#[test]
fn summarize_requires_a_grouped_table() {
    let err = pipeline(ledger_batch(), [summarize(&["total = sum(amount)"])]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn summarize_rejects_malformed_specs() {
    let err = pipeline(
        ledger_batch(),
        [group_by(&["k"]), summarize(&["total: sum(amount)"])],
    )
    .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn summarize_rejects_unknown_functions() {
    let err = pipeline(
        ledger_batch(),
        [group_by(&["k"]), summarize(&["m = median(amount)"])],
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownAggregation(name) if name == "median"));
}

#[test]
fn summarize_missing_source_column_fails() {
    let err = pipeline(
        ledger_batch(),
        [group_by(&["k"]), summarize(&["t = sum(absent)"])],
    )
    .unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(name) if name == "absent"));
}
