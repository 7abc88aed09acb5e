//! Deferred, composable table-transformation pipelines over Arrow record
//! batches.
//!
//! framepipe expresses a sequence of table transformations as reusable
//! [`Stage`] values built ahead of time and applied left to right by
//! [`pipeline`]. A stage captures only its construction-time arguments; no
//! data is touched, no directive string parsed, and no column name resolved
//! until the runner hands it a table. That makes a stage list a small,
//! declarative program: the same stages can run against any number of input
//! tables, and a stage may reference columns created by earlier stages in the
//! same run.
//!
//! ```
//! use arrow::array::{Int64Array, RecordBatch, StringArray};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use framepipe::{arrange, filter, pipeline, select, Row, RowPredicate};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("name", DataType::Utf8, false),
//!     Field::new("score", DataType::Int64, false),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(StringArray::from(vec!["ada", "grace", "edsger"])),
//!         Arc::new(Int64Array::from(vec![70, 95, 88])),
//!     ],
//! )
//! .unwrap();
//!
//! let passing: RowPredicate = Box::new(|row: &Row<'_>| Ok(row.i64("score")? >= 80));
//! let result = pipeline(
//!     batch,
//!     [
//!         filter(vec![passing]),
//!         arrange(&["score desc"]),
//!         select(&["name"]),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(result.into_table().unwrap().num_rows(), 2);
//! ```
//!
//! # Stage purity and the mutate exception
//!
//! Every stage is pure with respect to its input except [`mutate`] and
//! [`mutate_row`], which assign columns into the table flowing through the
//! pipeline. Errors are never caught: the first failure aborts the run with
//! nothing rolled back, so a failed run may leave those assignments visible.

pub mod csv;
pub mod distinct;
pub mod filter;
pub mod group;
pub mod join;
pub mod mutate;
pub mod pipeline;
pub mod project;
pub mod row;
pub mod scalar;
pub mod slice;
pub mod sort;
pub mod value;

mod key;

pub use csv::{to_csv, CsvWriteOptions};
pub use distinct::distinct;
pub use filter::{filter, RowPredicate};
pub use group::{group_by, summarize};
pub use join::{anti_join, left_join};
pub use mutate::{mutate, mutate_row, ColumnTransform, RowTransform};
pub use pipeline::{pipeline, Stage};
pub use project::{rename, select};
pub use row::Row;
pub use scalar::Scalar;
pub use slice::{head, squeeze, tail};
pub use sort::arrange;
pub use value::{GroupedTable, Series, Value};

pub use framepipe_result::{Error, Result};
