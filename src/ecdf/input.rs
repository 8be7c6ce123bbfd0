use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a one-dimensional numeric sample. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one numeric column (Float64, Float32, Int64 or Int32);
///   `column` picks it by name, otherwise the first numeric column is used
/// * `.json`    – a top-level array of numbers, `[0.12, 0.5, ...]`
///
/// Null cells are skipped.
pub fn load_samples(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, column),
        "json" => load_json(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let samples: Vec<Option<f64>> = serde_json::from_str(&text)
        .with_context(|| format!("{}: expected a JSON array of numbers", path.display()))?;
    Ok(samples.into_iter().flatten().collect())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    )
}

fn load_parquet(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let col_idx = match column {
        Some(name) => {
            let idx = schema
                .index_of(name)
                .map_err(|_| DataError::MissingColumn(name.to_string()))?;
            let data_type = schema.field(idx).data_type();
            if !is_numeric(data_type) {
                return Err(DataError::UnsupportedColumnType {
                    column: name.to_string(),
                    data_type: format!("{data_type:?}"),
                }
                .into());
            }
            idx
        }
        None => schema
            .fields()
            .iter()
            .position(|f| is_numeric(f.data_type()))
            .ok_or_else(|| DataError::MissingColumn("<any numeric>".to_string()))?,
    };
    log::debug!(
        "Reading sample column '{}' from {}",
        schema.field(col_idx).name(),
        path.display()
    );

    let reader = builder.build().context("building parquet reader")?;
    let mut samples = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        extend_f64(&mut samples, batch.column(col_idx))?;
    }
    Ok(samples)
}

/// Append the non-null values of a numeric column as `f64`.
fn extend_f64(out: &mut Vec<f64>, col: &ArrayRef) -> Result<()> {
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        out.extend(arr.iter().flatten());
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        out.extend(arr.iter().flatten().map(f64::from));
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        out.extend(arr.iter().flatten().map(|v| v as f64));
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        out.extend(arr.iter().flatten().map(f64::from));
    } else {
        anyhow::bail!("unexpected sample column type {:?}", col.data_type());
    }
    Ok(())
}
