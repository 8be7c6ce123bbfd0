use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use wf_features::data::loader::INSTANCES_PER_FILE;
use wf_features::logging::{self, LogConfig};

/// Write a synthetic feature directory and a sample file for the ECDF tool.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Cli {
    /// Output directory.
    #[arg(default_value = "sample_data")]
    out: PathBuf,

    /// Number of site classes.
    #[arg(long, default_value_t = 5)]
    sites: u32,

    /// Feature files per site.
    #[arg(long, default_value_t = 3)]
    files_per_site: u32,

    /// Features per instance.
    #[arg(long, default_value_t = 8)]
    features: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Seeded xoshiro256** generator; splitmix64 expands the seed into state.
struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    fn seeded(seed: u64) -> Self {
        let mut sm = seed;
        let mut splitmix = || {
            sm = sm.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = sm;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        };
        Xoshiro256 {
            s: [splitmix(), splitmix(), splitmix(), splitmix()],
        }
    }

    fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = self.s;
        let out = s1.wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let s2 = s2 ^ s0;
        let s3 = s3 ^ s1;
        let s1 = s1 ^ s2;
        let s0 = s0 ^ s3;
        self.s = [s0, s1, s2 ^ (self.s[1] << 17), s3.rotate_left(45)];
        out
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Normal draw via Box-Muller.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.unit().max(f64::MIN_POSITIVE).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        mean + std_dev * radius * angle.cos()
    }
}

/// One feature file: a site-specific mean per feature plus noise. Roughly
/// one field in two hundred is replaced by a non-numeric token.
fn write_feature_file(
    path: &Path,
    rows: usize,
    site_means: &[f64],
    rng: &mut Xoshiro256,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for _ in 0..rows {
        let fields: Vec<String> = site_means
            .iter()
            .map(|&mu| {
                if rng.below(200) == 0 {
                    "NA".to_string()
                } else {
                    format!("{:.4}", rng.normal(mu, 1.0))
                }
            })
            .collect();
        writeln!(out, "{}", fields.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

fn write_sample_parquet(path: &Path, values: Vec<f64>) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![Field::new("value", DataType::Float64, false)]));
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(Float64Array::from(values))])
        .context("building sample record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogConfig::new("generate", false))?;
    let mut rng = Xoshiro256::seeded(cli.seed);

    let features_dir = cli.out.join("features");
    fs::create_dir_all(&features_dir)
        .with_context(|| format!("creating {}", features_dir.display()))?;

    let mut written = 0usize;
    for site in 1..=cli.sites {
        let means: Vec<f64> = (0..cli.features)
            .map(|_| rng.normal(0.0, 10.0))
            .collect();

        for id in 1..=cli.files_per_site {
            // Every site's last file falls one instance short and is skipped by the loader.
            let rows = if id == cli.files_per_site && cli.files_per_site > 1 {
                INSTANCES_PER_FILE - 1
            } else {
                INSTANCES_PER_FILE + rng.below(100) as usize
            };
            let path = features_dir.join(format!("{site}_{id}.csv"));
            write_feature_file(&path, rows, &means, &mut rng)?;
            log::debug!("Wrote {} ({rows} instances)", path.display());
            written += 1;
        }
    }
    log::info!("Wrote {written} feature files to {}", features_dir.display());

    let ecdf_dir = cli.out.join("ecdf");
    fs::create_dir_all(&ecdf_dir).with_context(|| format!("creating {}", ecdf_dir.display()))?;
    let values: Vec<f64> = (0..1000).map(|_| rng.normal(0.0, 1.0).abs()).collect();
    let sample_path = ecdf_dir.join("leakage.parquet");
    write_sample_parquet(&sample_path, values)?;

    println!(
        "Wrote {written} feature files to {} and a 1000-value sample to {}",
        features_dir.display(),
        sample_path.display()
    );
    Ok(())
}
