//! Segmentation and aggregation pipeline
//!
//! Corpus walker -> file batcher -> per-file segment pool -> aggregator -> sink.

/// Single-writer row aggregation per output file
pub mod aggregator;
/// Size- and count-bounded file batches
pub mod batch;
/// Label directory walk
pub mod corpus;
/// Per-file segment worker pool
pub mod pool;
/// Interval planning
pub mod segment;

pub use aggregator::{Aggregator, AggregatorMessage, RowSender};
pub use batch::{FileBatcher, FileEntry};
pub use segment::{Segment, SegmentPlan, Segmenter};

use crate::config::Config;
use crate::decoder::{Decoder, SymphoniaDecoder};
use crate::error::PipelineResult;
use crate::features::{FeatureExtractor, SpectralExtractor};
use std::ops::AddAssign;
use std::path::Path;

/// Segment and row counters for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Segments handed to a worker
    pub segments_dispatched: u64,
    /// Segments dropped for being too short
    pub segments_dropped: u64,
    /// Rows delivered to the aggregator
    pub rows_sent: u64,
    /// Rows lost to extractor or worker failures
    pub rows_failed: u64,
    /// Rows written by the sink
    pub rows_written: u64,
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, other: FileStats) {
        self.segments_dispatched += other.segments_dispatched;
        self.segments_dropped += other.segments_dropped;
        self.rows_sent += other.rows_sent;
        self.rows_failed += other.rows_failed;
        self.rows_written += other.rows_written;
    }
}

/// Outcome of processing one label directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelReport {
    /// Files whose output was written and closed
    pub files_completed: u64,
    /// Files skipped on decode or sink failure
    pub files_failed: u64,
    /// Batches run
    pub batches: u64,
    /// Summed file counters
    pub stats: FileStats,
}

/// Outcome of a whole corpus walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusReport {
    /// Labels whose every file was written
    pub labels_completed: u64,
    /// Labels processed with at least one failed file
    pub labels_partial: u64,
    /// Labels skipped on failure
    pub labels_skipped: u64,
    /// Files whose output was written and closed
    pub files_completed: u64,
    /// Files skipped on decode or sink failure
    pub files_failed: u64,
    /// Summed file counters
    pub stats: FileStats,
}

impl AddAssign<LabelReport> for CorpusReport {
    fn add_assign(&mut self, label: LabelReport) {
        self.files_completed += label.files_completed;
        self.files_failed += label.files_failed;
        self.stats += label.stats;
    }
}

/// Configuration plus the decoder and extractor collaborators
pub struct Pipeline {
    config: Config,
    decoder: Box<dyn Decoder>,
    extractor: Box<dyn FeatureExtractor>,
}

impl Pipeline {
    /// Create a pipeline; fails on invalid configuration
    pub fn new(
        config: Config,
        decoder: Box<dyn Decoder>,
        extractor: Box<dyn FeatureExtractor>,
    ) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Pipeline {
            config,
            decoder,
            extractor,
        })
    }

    /// Symphonia decoding and spectral features sized by `config.n_mfcc`
    pub fn from_config(config: Config) -> PipelineResult<Self> {
        let extractor = SpectralExtractor::new(config.n_mfcc)?;
        Self::new(config, Box::new(SymphoniaDecoder::new()), Box::new(extractor))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the decoder
    pub fn decoder(&self) -> &dyn Decoder {
        self.decoder.as_ref()
    }

    /// Get the feature extractor
    pub fn extractor(&self) -> &dyn FeatureExtractor {
        self.extractor.as_ref()
    }

    /// Segment one file and append its rows to `output`
    pub fn process_file(&self, label: &str, input: &Path, output: &Path) -> PipelineResult<FileStats> {
        pool::process_file(self, label, input, output)
    }

    /// Process every file of one label directory in bounded batches.
    ///
    /// `output_dir` must already exist.
    pub fn process_label(
        &self,
        label: &str,
        input_dir: &Path,
        output_dir: &Path,
    ) -> PipelineResult<LabelReport> {
        batch::process_label(self, label, input_dir, output_dir)
    }

    /// Walk every label directory under `input_root`
    pub fn run(&self, input_root: &Path, output_root: &Path) -> PipelineResult<CorpusReport> {
        corpus::walk(self, input_root, output_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let config = Config {
            interval_secs: 0.0,
            ..Config::default()
        };
        assert!(Pipeline::from_config(config).is_err());
    }

    #[test]
    fn test_pipeline_from_config() {
        let config = Config {
            n_mfcc: 13,
            ..Config::default()
        };
        let pipeline = Pipeline::from_config(config).unwrap();
        assert_eq!(pipeline.extractor().width(), (10 + 13) * 4);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut report = CorpusReport::default();
        let label = LabelReport {
            files_completed: 2,
            files_failed: 1,
            batches: 1,
            stats: FileStats {
                segments_dispatched: 10,
                rows_sent: 9,
                rows_failed: 1,
                rows_written: 9,
                ..FileStats::default()
            },
        };
        report += label;
        report += label;
        assert_eq!(report.files_completed, 4);
        assert_eq!(report.files_failed, 2);
        assert_eq!(report.stats.rows_written, 18);
    }
}
