use crate::error::{PipelineError, PipelineResult};
use crate::processor::Segment;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Mono samples and sample rate returned by a decoder
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples, f32 from -1.0 to 1.0
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

/// A decoded file held for the duration of its processing run
#[derive(Debug)]
pub struct Recording {
    /// Label (genre) the file belongs to
    label: String,
    /// Source path
    path: PathBuf,
    /// Mono samples, read-only once decoded
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl Recording {
    /// Wrap decoded audio for a labelled source file
    pub fn new<S: Into<String>, P: Into<PathBuf>>(
        label: S,
        path: P,
        audio: DecodedAudio,
    ) -> PipelineResult<Self> {
        if audio.sample_rate == 0 {
            return Err(PipelineError::InvalidSampleRate { rate: 0 });
        }

        Ok(Recording {
            label: label.into(),
            path: path.into(),
            samples: audio.samples,
            sample_rate: audio.sample_rate,
        })
    }

    /// Get the label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total sample count
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the recording holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get duration of the recording
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Borrow the samples covered by a segment
    pub fn segment(&self, segment: &Segment) -> &[f32] {
        let end = segment.end.min(self.samples.len());
        let start = segment.start.min(end);
        &self.samples[start..end]
    }
}

/// Feature values of one segment followed by the file's label
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Extracted features in stable order
    pub values: Vec<f64>,
    /// Label appended as the final field
    pub label: String,
}

impl FeatureRow {
    /// Create a row from extracted values and a label
    pub fn new<S: Into<String>>(values: Vec<f64>, label: S) -> Self {
        FeatureRow {
            values,
            label: label.into(),
        }
    }

    /// Number of fields written for this row (values plus label)
    pub fn field_count(&self) -> usize {
        self.values.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(len: usize, sample_rate: u32) -> DecodedAudio {
        DecodedAudio {
            samples: (0..len).map(|i| i as f32).collect(),
            sample_rate,
        }
    }

    #[test]
    fn test_recording_creation() {
        let recording = Recording::new("jazz", "data/jazz/a.mp3", audio(44100, 44100)).unwrap();
        assert_eq!(recording.label(), "jazz");
        assert_eq!(recording.len(), 44100);
        assert_eq!(recording.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_recording_invalid_rate() {
        let result = Recording::new("jazz", "a.mp3", audio(10, 0));
        assert!(matches!(
            result,
            Err(PipelineError::InvalidSampleRate { rate: 0 })
        ));
    }

    #[test]
    fn test_segment_view() {
        let recording = Recording::new("rock", "a.wav", audio(10, 1)).unwrap();
        let view = recording.segment(&Segment {
            index: 1,
            start: 4,
            end: 8,
        });
        assert_eq!(view, &[4.0, 5.0, 6.0, 7.0]);

        let clamped = recording.segment(&Segment {
            index: 2,
            start: 8,
            end: 20,
        });
        assert_eq!(clamped, &[8.0, 9.0]);
    }

    #[test]
    fn test_feature_row_field_count() {
        let row = FeatureRow::new(vec![1.0, 2.0, 3.0], "blues");
        assert_eq!(row.field_count(), 4);
    }
}
