use std::io;
use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error types for the segmentation and feature pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Invalid audio metadata
    #[error("Invalid audio metadata: {0}")]
    InvalidMetadata(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Feature extraction failed for one segment
    #[error("Extract error: {0}")]
    ExtractError(String),

    /// Output sink could not be opened or written
    #[error("Sink error: {0}")]
    SinkError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Extractor returned a vector of unexpected width
    #[error("Feature width mismatch: expected {expected}, got {got}")]
    FeatureWidth {
        /// Width advertised by the extractor
        expected: usize,
        /// Width actually produced
        got: usize,
    },

    /// A worker thread could not be spawned or panicked
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<symphonia::core::errors::Error> for PipelineError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        PipelineError::DecodeError(err.to_string())
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}
