use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Logger settings chosen by a binary at startup.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is not set.
    pub level: LevelFilter,
    /// Name printed in every record, usually the binary name.
    pub process_name: String,
}

impl LogConfig {
    pub fn new(process_name: impl Into<String>, verbose: bool) -> Self {
        Self {
            level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            process_name: process_name.into(),
        }
    }
}

/// Warnings and errors go to stderr, everything below to stdout.
fn goes_to_stderr(level: Level) -> bool {
    level <= Level::Warn
}

/// Two env_logger sinks sharing one filter, picked per record level.
struct SplitLogger {
    stdout: env_logger::Logger,
    stderr: env_logger::Logger,
}

impl Log for SplitLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.stdout.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if goes_to_stderr(record.level()) {
            self.stderr.log(record);
        } else {
            self.stdout.log(record);
        }
    }

    fn flush(&self) {
        self.stdout.flush();
        self.stderr.flush();
    }
}

fn build_sink(config: &LogConfig, target: env_logger::Target) -> env_logger::Logger {
    let process_name = config.process_name.clone();
    env_logger::Builder::new()
        .filter_level(config.level)
        .parse_default_env()
        .target(target)
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{}][{:<10}][{}] {}",
                buf.timestamp(),
                process_name,
                record.level(),
                record.args()
            )
        })
        .build()
}

/// Install the process logger. Call once, first thing in `main`.
///
/// Records look like `[2024-01-01T12:00:00Z][ecdf      ][INFO] message`.
/// `RUST_LOG` overrides `config.level`.
pub fn init(config: LogConfig) -> Result<(), SetLoggerError> {
    let stdout = build_sink(&config, env_logger::Target::Stdout);
    let stderr = build_sink(&config, env_logger::Target::Stderr);
    let max_level = stdout.filter();

    log::set_boxed_logger(Box::new(SplitLogger { stdout, stderr }))?;
    log::set_max_level(max_level);
    Ok(())
}
