//! Pipeline configuration

use crate::error::{PipelineError, PipelineResult};
use crate::features::spectral::N_MELS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Immutable run configuration, built once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Segment length in seconds
    pub interval_secs: f64,
    /// Number of leading intervals skipped in every file
    pub warmup_intervals: usize,
    /// Segments shorter than this many samples are dropped
    pub min_segment_samples: usize,
    /// Maximum concurrently running segment workers per file
    pub worker_limit: usize,
    /// Maximum number of files in one batch
    pub batch_file_limit: usize,
    /// Maximum cumulative on-disk size of one batch, in bytes
    pub batch_size_limit: u64,
    /// Number of MFCC coefficients produced by the extractor
    pub n_mfcc: usize,
    /// Capacity of each aggregator's inbound row queue
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interval_secs: 60.0,
            warmup_intervals: 1,
            min_segment_samples: 256,
            worker_limit: 50,
            batch_file_limit: 5,
            batch_size_limit: 150_000_000,
            n_mfcc: 20,
            channel_capacity: 64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check threshold values before any processing starts
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err(PipelineError::ConfigError(format!(
                "interval length must be a positive number of seconds, got {}",
                self.interval_secs
            )));
        }
        if self.worker_limit == 0 {
            return Err(PipelineError::ConfigError(
                "worker limit must be at least 1".to_string(),
            ));
        }
        if self.batch_file_limit == 0 {
            return Err(PipelineError::ConfigError(
                "batch file limit must be at least 1".to_string(),
            ));
        }
        if self.batch_size_limit == 0 {
            return Err(PipelineError::ConfigError(
                "batch size limit must be at least 1 byte".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(PipelineError::ConfigError(
                "channel capacity must be at least 1".to_string(),
            ));
        }
        if self.n_mfcc == 0 || self.n_mfcc > N_MELS {
            return Err(PipelineError::ConfigError(format!(
                "mfcc count must be between 1 and {}, got {}",
                N_MELS, self.n_mfcc
            )));
        }
        Ok(())
    }

    /// Segment length as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }

    /// Number of samples per interval at the given sample rate
    pub fn interval_samples(&self, sample_rate: u32) -> usize {
        (self.interval_secs * sample_rate as f64).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let mut config = Config::default();
        config.interval_secs = 0.0;
        assert!(matches!(config.validate(), Err(PipelineError::ConfigError(_))));

        config.interval_secs = -5.0;
        assert!(config.validate().is_err());

        config.interval_secs = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_limits() {
        let config = Config {
            worker_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            batch_file_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            channel_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_mfcc_out_of_range() {
        let config = Config {
            n_mfcc: N_MELS + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("interval_secs = 5.0\nworker_limit = 4\n").unwrap();
        assert_eq!(config.interval_secs, 5.0);
        assert_eq!(config.worker_limit, 4);
        assert_eq!(config.warmup_intervals, 1);
        assert_eq!(config.n_mfcc, 20);
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml_str("interval_secs = \"soon\"");
        assert!(matches!(result, Err(PipelineError::ConfigError(_))));
    }

    #[test]
    fn test_interval_samples_rounds_up() {
        let config = Config {
            interval_secs: 0.5,
            ..Config::default()
        };
        assert_eq!(config.interval_samples(44100), 22050);
        assert_eq!(config.interval_samples(3), 2);
    }
}
