use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cache::{CACHE_FILE_NAME, read_cache, write_cache};
use super::coerce::parse_field;
use super::model::Dataset;
use crate::error::DataError;

/// Instances kept per feature file. Shorter files are dropped entirely.
pub const INSTANCES_PER_FILE: usize = 500;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How feature files are selected and split into fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Only files whose name ends with this suffix are read.
    pub extension: String,
    /// Field separator inside a feature file.
    pub delimiter: char,
    /// Files yielding fewer instances are skipped; longer ones are cut.
    pub instances_per_file: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: ".csv".to_string(),
            delimiter: ' ',
            instances_per_file: INSTANCES_PER_FILE,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Path of the cache for a feature directory.
pub fn cache_path(directory: &Path) -> PathBuf {
    directory.join(CACHE_FILE_NAME)
}

/// Load every feature file under `directory` into one dataset.
///
/// The first call parses the files and writes `features.parquet` into
/// `directory`; later calls return that cache unchanged. Delete the cache
/// to pick up changed sources.
pub fn load_data(directory: &Path, options: &LoadOptions) -> Result<Dataset> {
    let cache = cache_path(directory);
    if cache.exists() {
        log::info!("Loading cached features from {}", cache.display());
        return read_cache(&cache);
    }

    let delimiter = delimiter_byte(options.delimiter)?;
    let mut files = Vec::new();
    collect_files(directory, &options.extension, &mut files)?;
    log::debug!("Found {} feature files under {}", files.len(), directory.display());

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<i64> = Vec::new();
    let mut skipped = 0usize;

    for path in &files {
        let class_id = parse_class_id(path)?;
        let mut instances = read_instances(path, delimiter)?;

        if instances.len() < options.instances_per_file {
            log::debug!(
                "Skipping {}: {} instances, need {}",
                path.display(),
                instances.len(),
                options.instances_per_file
            );
            skipped += 1;
            continue;
        }
        instances.truncate(options.instances_per_file);

        labels.extend(std::iter::repeat(class_id - 1).take(instances.len()));
        rows.extend(instances);
    }

    remap_labels(&mut labels);
    let dataset = Dataset::from_rows(rows, labels)
        .with_context(|| format!("assembling features from {}", directory.display()))?;

    log::info!(
        "Loaded {} instances from {} files ({} skipped), {} sites",
        dataset.len(),
        files.len() - skipped,
        skipped,
        dataset.view().sites().len()
    );

    write_cache(&cache, &dataset)?;
    log::info!("Wrote feature cache {}", cache.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Directory walk
// ---------------------------------------------------------------------------

/// Recursively collect files ending in `extension`, visiting each
/// directory's entries in name order.
fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("listing directory {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("inspecting {}", path.display()))?;

        if file_type.is_dir() {
            collect_files(&path, extension, out)?;
        } else if entry.file_name().to_string_lossy().ends_with(extension) {
            out.push(path);
        }
    }
    Ok(())
}

/// Class id from a `<class>_<anything>` file name.
fn parse_class_id(path: &Path) -> Result<i64, DataError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    name.split_once('_')
        .and_then(|(class, _)| class.parse::<i64>().ok())
        .ok_or(DataError::MalformedFileName { name })
}

// ---------------------------------------------------------------------------
// Feature file parsing
// ---------------------------------------------------------------------------

fn delimiter_byte(delimiter: char) -> Result<u8, DataError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(DataError::InvalidDelimiter(delimiter))
    }
}

/// Read one feature file: one instance per line, empty fields dropped,
/// blank lines ignored, non-numeric fields coerced to zero.
fn read_instances(path: &Path, delimiter: u8) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut instances = Vec::new();
    let mut defaulted = 0usize;

    for (line_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{}: record {line_no}", path.display()))?;

        let instance: Vec<f64> = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| {
                let parsed = parse_field(field);
                if parsed.is_defaulted() {
                    defaulted += 1;
                }
                parsed.value()
            })
            .collect();

        if !instance.is_empty() {
            instances.push(instance);
        }
    }

    if defaulted > 0 {
        log::debug!("{}: {defaulted} non-numeric fields set to 0", path.display());
    }
    Ok(instances)
}

/// Replace labels with their rank among the distinct labels, so the
/// result covers `0..k` without gaps.
fn remap_labels(labels: &mut [i64]) {
    let mut dense: BTreeMap<i64, i64> = labels.iter().map(|&l| (l, 0)).collect();
    for (rank, slot) in dense.values_mut().enumerate() {
        *slot = rank as i64;
    }
    for label in labels.iter_mut() {
        *label = dense[&*label];
    }
}
