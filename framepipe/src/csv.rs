//! CSV checkpointing mid-pipeline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, RecordBatch};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use framepipe_result::Result;

use crate::pipeline::Stage;
use crate::value::{expect_table, Value};

/// Configuration for writing CSV files.
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Write a header row with column names when true.
    pub include_header: bool,
    /// Delimiter to use between fields.
    pub delimiter: u8,
    /// Representation of null cells; the writer's default (empty) when unset.
    pub null_value: Option<String>,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            delimiter: b',',
            null_value: None,
        }
    }
}

/// Serialize the table to `path` (overwriting) and pass it on unchanged.
///
/// A side-effecting checkpoint: the received table flows out exactly as it
/// came in, so the pipeline can continue past the write. With `index` true a
/// leading unnamed row-label column `0..n` is emitted, matching the table's
/// current row order.
pub fn to_csv(path: impl AsRef<Path>, index: bool, options: CsvWriteOptions) -> Stage {
    let path: PathBuf = path.as_ref().to_path_buf();
    Stage::new("to_csv", move |value| {
        let batch = expect_table(value, "to_csv")?;
        let output = if index {
            with_index_column(&batch)?
        } else {
            batch.clone()
        };

        tracing::trace!(path = %path.display(), rows = output.num_rows(), "writing CSV checkpoint");
        let file = File::create(&path)?;
        let mut builder = WriterBuilder::new()
            .with_header(options.include_header)
            .with_delimiter(options.delimiter);
        if let Some(null_value) = &options.null_value {
            builder = builder.with_null(null_value.clone());
        }
        let mut writer = builder.build(BufWriter::new(file));
        writer.write(&output)?;
        writer.into_inner().flush()?;

        Ok(Value::Table(batch))
    })
}

/// Prepend an unnamed Int64 row-label column `0..n`.
fn with_index_column(batch: &RecordBatch) -> Result<RecordBatch> {
    let labels = Int64Array::from_iter_values(0..batch.num_rows() as i64);
    let mut fields: Vec<Field> = vec![Field::new("", DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(labels)];
    for (idx, field) in batch.schema().fields().iter().enumerate() {
        fields.push(field.as_ref().clone());
        arrays.push(batch.column(idx).clone());
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}
