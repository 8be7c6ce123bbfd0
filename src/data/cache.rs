use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array, Float64Builder, Int64Array, ListArray, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::Dataset;
use crate::error::DataError;

/// File name of the cache written next to the feature files.
pub const CACHE_FILE_NAME: &str = "features.parquet";

const FEATURES_COLUMN: &str = "features";
const LABEL_COLUMN: &str = "label";

// ---------------------------------------------------------------------------
// Parquet feature cache
// ---------------------------------------------------------------------------
//
// One row per instance:
//   features: List<Float64>   – the feature vector
//   label:    Int64           – dense class label

fn cache_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(
            FEATURES_COLUMN,
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        ),
        Field::new(LABEL_COLUMN, DataType::Int64, false),
    ]))
}

/// Persist `dataset` as a Parquet cache at `path`, replacing any existing file.
pub fn write_cache(path: &Path, dataset: &Dataset) -> Result<()> {
    let mut features = ListBuilder::new(Float64Builder::new());
    for row in dataset.x.rows() {
        let values = features.values();
        for &v in row {
            values.append_value(v);
        }
        features.append(true);
    }
    let labels = Int64Array::from(dataset.y.to_vec());

    let schema = cache_schema();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(features.finish()), Arc::new(labels)],
    )
    .context("building cache record batch")?;

    let file = File::create(path)
        .with_context(|| format!("creating cache file {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing cache batch")?;
    writer.close().context("closing cache file")?;
    Ok(())
}

/// Read a cache previously written by [`write_cache`].
pub fn read_cache(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("opening cache file {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading cache metadata")?
        .build()
        .context("building cache reader")?;

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading cache record batch")?;

        let features = batch
            .column_by_name(FEATURES_COLUMN)
            .ok_or_else(|| DataError::MissingColumn(FEATURES_COLUMN.to_string()))?
            .as_any()
            .downcast_ref::<ListArray>()
            .context("cache 'features' column is not a list")?;
        let label_col = batch
            .column_by_name(LABEL_COLUMN)
            .ok_or_else(|| DataError::MissingColumn(LABEL_COLUMN.to_string()))?
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("cache 'label' column is not Int64")?;

        for row in 0..batch.num_rows() {
            if features.is_null(row) || label_col.is_null(row) {
                bail!("cache row {row} contains a null value");
            }
            let values = features.value(row);
            let values = values
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("cache feature values are not Float64")?;
            rows.push(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect());
            labels.push(label_col.value(row));
        }
    }

    Ok(Dataset::from_rows(rows, labels)?)
}
