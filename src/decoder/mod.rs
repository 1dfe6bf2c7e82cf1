//! Audio decoder implementations

/// Symphonia-backed decoder
pub mod symphonia;

pub use self::symphonia::SymphoniaDecoder;

use crate::core::DecodedAudio;
use crate::error::PipelineResult;
use std::path::Path;

/// Turns a file path into mono samples and a sample rate
pub trait Decoder: Send + Sync {
    /// Decode the whole file into memory
    fn decode(&self, path: &Path) -> PipelineResult<DecodedAudio>;
}
