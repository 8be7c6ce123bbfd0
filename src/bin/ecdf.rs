use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use wf_features::ecdf::{Ecdf, load_samples, output_path};
use wf_features::logging::{self, LogConfig};

/// Generate the x and y of an ECDF.
#[derive(Debug, Parser)]
#[command(name = "ecdf", version)]
struct Cli {
    /// Sample file (`.parquet` or `.json`). Also accepted as `-dir`.
    #[arg(long = "dir", value_name = "FILE")]
    dir: PathBuf,

    /// Directory for the `<parent>_ecdf.dat` file. Defaults to the input's directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Parquet column holding the sample. Defaults to the first numeric column.
    #[arg(long)]
    column: Option<String>,

    /// Log debug messages.
    #[arg(short, long)]
    verbose: bool,
}

/// Accept the single-dash `-dir` spelling alongside `--dir`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| if arg == "-dir" { OsString::from("--dir") } else { arg })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    logging::init(LogConfig::new("ecdf", cli.verbose))?;

    let out_path = output_path(&cli.dir, cli.output.as_deref())?;
    let samples = load_samples(&cli.dir, cli.column.as_deref())?;
    log::info!("Loaded {} samples from {}", samples.len(), cli.dir.display());

    let ecdf = Ecdf::new(&samples);
    ecdf.save(&out_path)?;

    println!("Output to {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dash_dir_is_accepted() {
        let args = ["ecdf", "-dir", "runs/a/leak.parquet", "-o", "out"].map(OsString::from);
        let cli = Cli::parse_from(normalize_args(args));
        assert_eq!(cli.dir, PathBuf::from("runs/a/leak.parquet"));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.column.is_none());
    }

    #[test]
    fn double_dash_dir_and_long_output() {
        let args = ["ecdf", "--dir", "x/y.json", "--output", "o"].map(OsString::from);
        let cli = Cli::parse_from(normalize_args(args));
        assert_eq!(cli.dir, PathBuf::from("x/y.json"));
        assert_eq!(cli.output, Some(PathBuf::from("o")));
    }
}
