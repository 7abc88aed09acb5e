//! Left outer and anti join stages.

use arrow::array::{Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use framepipe::{anti_join, left_join, pipeline, Error};
use std::sync::Arc;

fn left_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["ann", "bob", "cal"])),
        ],
    )
    .unwrap()
}

fn right_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("city", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 1, 3])),
            Arc::new(StringArray::from(vec!["oslo", "turin", "quito"])),
        ],
    )
    .unwrap()
}

fn str_column(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let schema = batch.schema();
    let (idx, _) = schema.column_with_name(name).unwrap();
    let values = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    (0..values.len())
        .map(|i| {
            if values.is_null(i) {
                None
            } else {
                Some(values.value(i).to_string())
            }
        })
        .collect()
}

#[test]
fn left_join_preserves_unmatched_left_rows_with_nulls() {
    let joined = pipeline(left_batch(), [left_join(right_batch(), &["id"])])
        .unwrap()
        .into_table()
        .unwrap();
    // id=1 matches twice, id=2 not at all, id=3 once.
    assert_eq!(joined.num_rows(), 4);
    assert_eq!(
        str_column(&joined, "city"),
        vec![
            Some("oslo".to_string()),
            Some("turin".to_string()),
            None,
            Some("quito".to_string()),
        ]
    );
}

#[test]
fn left_join_keeps_left_row_order() {
    let joined = pipeline(left_batch(), [left_join(right_batch(), &["id"])])
        .unwrap()
        .into_table()
        .unwrap();
    let schema = joined.schema();
    let (idx, _) = schema.column_with_name("id").unwrap();
    let ids = joined
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ids.values().to_vec(), vec![1, 1, 2, 3]);
}

#[test]
fn left_join_suffixes_colliding_right_columns() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
    ]));
    let right = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1])),
            Arc::new(StringArray::from(vec!["anna"])),
        ],
    )
    .unwrap();
    let joined = pipeline(left_batch(), [left_join(right, &["id"])])
        .unwrap()
        .into_table()
        .unwrap();
    assert!(joined.schema().column_with_name("name").is_some());
    assert!(joined.schema().column_with_name("name_right").is_some());
}

#[test]
fn left_join_missing_key_column_fails() {
    let err = pipeline(left_batch(), [left_join(right_batch(), &["zip"])]).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(_)));
}

#[test]
fn anti_join_keeps_only_unmatched_rows() {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let right = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1]))]).unwrap();
    let remaining = pipeline(left_batch(), [anti_join(right, &["id"])])
        .unwrap()
        .into_table()
        .unwrap();
    assert_eq!(remaining.num_rows(), 2);
    // All left columns survive, none from the right table.
    assert_eq!(remaining.num_columns(), 2);
    assert_eq!(
        str_column(&remaining, "name"),
        vec![Some("bob".to_string()), Some("cal".to_string())]
    );
}

#[test]
fn anti_join_with_no_matches_is_identity_on_rows() {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let right = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![99]))]).unwrap();
    let remaining = pipeline(left_batch(), [anti_join(right, &["id"])])
        .unwrap()
        .into_table()
        .unwrap();
    assert_eq!(remaining.num_rows(), 3);
}

fn nullable_left_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new("name", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![Some(1), None, Some(2)])),
            Arc::new(StringArray::from(vec!["ann", "bob", "cal"])),
        ],
    )
    .unwrap()
}

fn nullable_right_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new("city", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![Some(1), None])),
            Arc::new(StringArray::from(vec!["oslo", "reno"])),
        ],
    )
    .unwrap()
}

#[test]
fn left_join_null_keys_never_match() {
    let joined = pipeline(
        nullable_left_batch(),
        [left_join(nullable_right_batch(), &["id"])],
    )
    .unwrap()
    .into_table()
    .unwrap();
    // The null-keyed left row does not pair with the null-keyed right row:
    // it emits exactly one row with the right columns null. id=2 has no
    // match either, so only id=1 picks up a city.
    assert_eq!(joined.num_rows(), 3);
    assert_eq!(
        str_column(&joined, "city"),
        vec![Some("oslo".to_string()), None, None]
    );
}

#[test]
fn anti_join_keeps_null_keyed_left_rows() {
    let remaining = pipeline(
        nullable_left_batch(),
        [anti_join(nullable_right_batch(), &["id"])],
    )
    .unwrap()
    .into_table()
    .unwrap();
    // id=1 appears in the right table and drops; the null key matches
    // nothing, so that row survives alongside the unmatched id=2.
    assert_eq!(remaining.num_rows(), 2);
    assert_eq!(
        str_column(&remaining, "name"),
        vec![Some("bob".to_string()), Some("cal".to_string())]
    );
}

#[test]
fn join_stage_is_reusable_across_runs() {
    let stage = left_join(right_batch(), &["id"]);
    let first = stage.apply(left_batch().into()).unwrap();
    let second = stage.apply(left_batch().into()).unwrap();
    assert_eq!(first, second);
}
