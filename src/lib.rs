#![warn(missing_docs)]

//! # featurize-rs: labelled audio feature datasets
//!
//! Turns a corpus of long recordings, one directory per label, into one CSV
//! file of feature rows per recording.
//!
//! ## Pipeline
//!
//! - **Corpus walker** - iterates label directories and mirrors them in the output root
//! - **File batcher** - groups a label's files into batches bounded by size and count
//! - **Segment pool** - cuts one decoded file into fixed intervals and extracts
//!   features on a bounded number of worker threads
//! - **Aggregator** - single writer per file, fed through a bounded queue
//!
//! ## Quick Start
//!
//! ```ignore
//! use featurize_rs::{Config, Pipeline};
//! use std::path::Path;
//!
//! let config = Config { interval_secs: 30.0, ..Config::default() };
//! let pipeline = Pipeline::from_config(config)?;
//! let report = pipeline.run(Path::new("data"), Path::new("processdata"))?;
//! println!("{} rows written", report.stats.rows_written);
//! ```

/// Run configuration
pub mod config;
/// Core data types
pub mod core;
/// Audio decoder implementations
pub mod decoder;
/// Error types for pipeline operations
pub mod error;
/// Feature extractor implementations
pub mod features;
/// Segmentation and aggregation pipeline
pub mod processor;
/// Output sink implementations
pub mod sink;

// Export public types
pub use config::Config;
pub use self::core::{DecodedAudio, FeatureRow, Recording};
pub use decoder::Decoder;
pub use error::{PipelineError, PipelineResult};
pub use features::FeatureExtractor;
pub use processor::{CorpusReport, FileStats, LabelReport, Pipeline};
pub use sink::Sink;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
