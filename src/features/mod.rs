//! Feature extractor implementations

/// STFT based spectral, chroma, HPSS, tempo and MFCC features
pub mod spectral;
/// Per-series summary statistics
pub mod stats;

pub use spectral::SpectralExtractor;
pub use stats::{FeatureGroups, Summary};

use crate::error::PipelineResult;

/// Reduces a segment of mono samples to a fixed-width feature vector
pub trait FeatureExtractor: Send + Sync {
    /// Number of values returned by every successful `extract` call
    fn width(&self) -> usize;

    /// Compute the feature vector for one segment
    fn extract(&self, samples: &[f32], sample_rate: u32) -> PipelineResult<Vec<f64>>;
}
