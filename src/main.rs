//! featurize command line interface
//!
//! Cuts every recording of a labelled corpus into intervals and writes one
//! CSV of feature rows per recording.

use clap::Parser;
use featurize_rs::{Config, Pipeline, PipelineResult};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "featurize")]
#[command(about = "Labelled audio feature dataset builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Input root, one subdirectory per label
    #[arg(value_name = "INPUT_DIR")]
    input: PathBuf,

    /// Output root, label subdirectories are created as needed
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// TOML configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Interval length in seconds
    #[arg(short, long, value_name = "SECS")]
    interval: Option<f64>,

    /// Leading intervals skipped in every file
    #[arg(short, long, value_name = "N")]
    warmup: Option<usize>,

    /// Segments shorter than this many samples are dropped
    #[arg(long, value_name = "SAMPLES")]
    min_samples: Option<usize>,

    /// Concurrent segment workers per file
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Files per batch
    #[arg(long, value_name = "N")]
    batch_files: Option<usize>,

    /// Cumulative on-disk size per batch, in bytes
    #[arg(long, value_name = "BYTES")]
    batch_bytes: Option<u64>,

    /// MFCC coefficient count
    #[arg(long, value_name = "N")]
    mfcc: Option<usize>,

    /// Row queue capacity per output file
    #[arg(long, value_name = "ROWS")]
    queue_capacity: Option<usize>,
}

impl Cli {
    /// Defaults, then the config file, then individual flags
    fn build_config(&self) -> PipelineResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };

        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(warmup) = self.warmup {
            config.warmup_intervals = warmup;
        }
        if let Some(min_samples) = self.min_samples {
            config.min_segment_samples = min_samples;
        }
        if let Some(workers) = self.workers {
            config.worker_limit = workers;
        }
        if let Some(batch_files) = self.batch_files {
            config.batch_file_limit = batch_files;
        }
        if let Some(batch_bytes) = self.batch_bytes {
            config.batch_size_limit = batch_bytes;
        }
        if let Some(mfcc) = self.mfcc {
            config.n_mfcc = mfcc;
        }
        if let Some(capacity) = self.queue_capacity {
            config.channel_capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("featurize {}", featurize_rs::VERSION);

    let config = cli.build_config()?;
    info!("configuration: {:?}", config);

    let pipeline = Pipeline::from_config(config)?;
    let report = pipeline.run(&cli.input, &cli.output)?;

    println!(
        "Labels: {} completed, {} partial, {} skipped",
        report.labels_completed, report.labels_partial, report.labels_skipped
    );
    println!(
        "Files: {} completed, {} failed",
        report.files_completed, report.files_failed
    );
    println!(
        "Segments: {} dispatched, {} too short; rows: {} written, {} dropped",
        report.stats.segments_dispatched,
        report.stats.segments_dropped,
        report.stats.rows_written,
        report.stats.rows_failed
    );

    Ok(())
}
