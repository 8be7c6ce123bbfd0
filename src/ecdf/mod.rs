//! Empirical CDF of a one-dimensional sample and its `.dat` export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::DataError;

pub mod input;

pub use input::load_samples;

/// Suffix appended to the output file name.
pub const OUTPUT_SUFFIX: &str = "_ecdf.dat";

// ---------------------------------------------------------------------------
// Ecdf – right-continuous step function
// ---------------------------------------------------------------------------

/// Empirical CDF evaluated at every observation.
///
/// `x[0]` is `-inf` with `y[0] = 0`; after that `x` holds the sorted sample
/// (duplicates kept) and `y[i] = i / n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ecdf {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Ecdf {
    pub fn new(samples: &[f64]) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mut x = Vec::with_capacity(sorted.len() + 1);
        let mut y = Vec::with_capacity(sorted.len() + 1);
        x.push(f64::NEG_INFINITY);
        y.push(0.0);
        for (i, v) in sorted.into_iter().enumerate() {
            x.push(v);
            y.push((i + 1) as f64 / n);
        }
        Ecdf { x, y }
    }

    /// Fraction of the sample `<= value`.
    pub fn eval(&self, value: f64) -> f64 {
        let idx = self.x.partition_point(|&x| x <= value);
        if idx == 0 { 0.0 } else { self.y[idx - 1] }
    }

    /// `(x, y)` pairs as written to disk: `-inf` becomes `0`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| {
            let x = if x == f64::NEG_INFINITY { 0.0 } else { x };
            (x, y)
        })
    }

    /// Write one `x<TAB>y` line per point, eight decimals each.
    pub fn write_dat<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (x, y) in self.points() {
            writeln!(out, "{x:.8}\t{y:.8}")?;
        }
        out.flush()
    }

    /// Write the points to a file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.write_dat(BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Where the ECDF of `input` is written.
///
/// The file is named after the directory holding the input
/// (`runs/site42/leak.parquet` → `site42_ecdf.dat`) and placed in that same
/// directory, or in `output_dir` when one is given. The last parent
/// segment is taken literally: `./leak.parquet` gives `._ecdf.dat`,
/// `a/../leak.parquet` gives `.._ecdf.dat`, and a file directly under the
/// root gives `_ecdf.dat`.
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf, DataError> {
    let parent = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| DataError::NoParentDirectory(input.to_path_buf()))?;
    let stem = match parent.components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        Some(Component::CurDir) => ".".to_string(),
        Some(Component::ParentDir) => "..".to_string(),
        Some(Component::RootDir) => String::new(),
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().into_owned(),
        None => return Err(DataError::NoParentDirectory(input.to_path_buf())),
    };

    let file_name = format!("{stem}{OUTPUT_SUFFIX}");
    Ok(output_dir.unwrap_or(parent).join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steps_over_sorted_sample() {
        let ecdf = Ecdf::new(&[3.0, 1.0, 2.0, 2.0]);
        assert_eq!(ecdf.x, vec![f64::NEG_INFINITY, 1.0, 2.0, 2.0, 3.0]);
        assert_eq!(ecdf.y, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn eval_counts_samples_at_or_below() {
        let ecdf = Ecdf::new(&[1.0, 2.0, 2.0, 3.0]);
        assert_relative_eq!(ecdf.eval(0.5), 0.0);
        assert_relative_eq!(ecdf.eval(1.0), 0.25);
        assert_relative_eq!(ecdf.eval(2.0), 0.75);
        assert_relative_eq!(ecdf.eval(2.5), 0.75);
        assert_relative_eq!(ecdf.eval(10.0), 1.0);
    }

    #[test]
    fn dat_output_replaces_negative_infinity() {
        let ecdf = Ecdf::new(&[1.0, 2.0, 2.0, 3.0]);
        let mut buf = Vec::new();
        ecdf.write_dat(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "0.00000000\t0.00000000");
        assert_eq!(lines[1], "1.00000000\t0.25000000");
        assert_eq!(lines[4], "3.00000000\t1.00000000");

        let points: Vec<(f64, f64)> = lines
            .iter()
            .map(|l| {
                let (x, y) = l.split_once('\t').unwrap();
                (x.parse().unwrap(), y.parse().unwrap())
            })
            .collect();
        assert!(points.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(points.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_relative_eq!(points.last().unwrap().1, 1.0);
    }

    #[test]
    fn empty_sample_has_only_the_leading_point() {
        let ecdf = Ecdf::new(&[]);
        assert_eq!(ecdf.points().collect::<Vec<_>>(), vec![(0.0, 0.0)]);
    }

    #[test]
    fn output_named_after_input_directory() {
        let path = output_path(Path::new("runs/site42/leak.parquet"), None).unwrap();
        assert_eq!(path, PathBuf::from("runs/site42/site42_ecdf.dat"));

        let path =
            output_path(Path::new("runs/site42/leak.parquet"), Some(Path::new("out"))).unwrap();
        assert_eq!(path, PathBuf::from("out/site42_ecdf.dat"));

        let path = output_path(Path::new("./leak.parquet"), None).unwrap();
        assert_eq!(path, PathBuf::from("./._ecdf.dat"));

        let path = output_path(Path::new("a/../leak.parquet"), None).unwrap();
        assert_eq!(path, PathBuf::from("a/../.._ecdf.dat"));

        let path = output_path(Path::new("/leak.parquet"), Some(Path::new("out"))).unwrap();
        assert_eq!(path, PathBuf::from("out/_ecdf.dat"));
    }

    #[test]
    fn bare_file_name_has_no_output_name() {
        assert!(matches!(
            output_path(Path::new("leak.parquet"), None),
            Err(DataError::NoParentDirectory(_))
        ));
    }
}
