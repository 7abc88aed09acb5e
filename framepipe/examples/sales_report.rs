//! Build a small sales table and run a grouped report through a pipeline.

use arrow::array::{Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use framepipe::{arrange, filter, group_by, pipeline, summarize, Row, RowPredicate};
use std::sync::Arc;

fn main() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("region", DataType::Utf8, false),
        Field::new("amount", DataType::Int64, false),
    ]));
    let sales = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![
                "north", "south", "north", "south", "east",
            ])),
            Arc::new(Int64Array::from(vec![120, 80, 45, 200, 10])),
        ],
    )
    .expect("failed to build sales table");

    let meaningful: RowPredicate = Box::new(|row: &Row<'_>| Ok(row.i64("amount")? >= 40));
    let report = pipeline(
        sales,
        [
            filter(vec![meaningful]),
            group_by(&["region"]),
            summarize(&["total = sum(amount)", "deals = count(amount)"]),
            arrange(&["total desc"]),
        ],
    )
    .expect("pipeline failed")
    .into_table()
    .expect("report is a table");

    println!("regions: {}", report.num_rows());
    println!("{report:?}");
}
