//! Core data types shared across the pipeline

/// Recording and feature row types
/// Recordings, decoded audio and feature rows
pub mod audio;

pub use audio::{DecodedAudio, FeatureRow, Recording};
