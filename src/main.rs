use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use wf_features::data::loader::{INSTANCES_PER_FILE, LoadOptions, cache_path, load_data};
use wf_features::logging::{self, LogConfig};

/// Load a directory of per-class feature files, building its cache on first use.
#[derive(Debug, Parser)]
#[command(name = "wf-features", version)]
struct Cli {
    /// Directory holding `<class>_<id><ext>` feature files.
    dir: PathBuf,

    /// Only read files ending with this suffix.
    #[arg(short, long, default_value = ".csv")]
    extension: String,

    /// Field delimiter inside feature files.
    #[arg(short, long, default_value_t = ' ')]
    delimiter: char,

    /// Instances kept per file; shorter files are skipped.
    #[arg(long, default_value_t = INSTANCES_PER_FILE)]
    instances_per_file: usize,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    /// Log debug messages.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    cache: PathBuf,
    instances: usize,
    features: usize,
    sites: usize,
    instances_per_site: BTreeMap<i64, usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogConfig::new("wf-features", cli.verbose))?;

    let options = LoadOptions {
        extension: cli.extension,
        delimiter: cli.delimiter,
        instances_per_file: cli.instances_per_file,
    };
    let dataset = load_data(&cli.dir, &options)?;
    let view = dataset.view();

    let summary = Summary {
        cache: cache_path(&cli.dir),
        instances: view.len(),
        features: view.features().len(),
        sites: view.sites().len(),
        instances_per_site: view.site_counts(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Cache:     {}", summary.cache.display());
        println!("Instances: {}", summary.instances);
        println!("Features:  {}", summary.features);
        println!("Sites:     {}", summary.sites);
        for (site, count) in &summary.instances_per_site {
            println!("  site {site:>4}: {count}");
        }
    }
    Ok(())
}
