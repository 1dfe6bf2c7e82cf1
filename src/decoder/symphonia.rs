use crate::core::DecodedAudio;
use crate::error::{PipelineError, PipelineResult};
use log::debug;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based whole-file decoder producing mono f32 samples
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        SymphoniaDecoder
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> PipelineResult<DecodedAudio> {
        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        // Probe the file to detect format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| PipelineError::UnsupportedFormat(e.to_string()))?;

        let mut reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| PipelineError::InvalidMetadata("No audio track found".to_string()))?
            .clone();

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| PipelineError::InvalidMetadata("Unknown sample rate".to_string()))?;
        if sample_rate == 0 {
            return Err(PipelineError::InvalidSampleRate { rate: 0 });
        }

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let mut samples = Vec::new();
        let mut skipped_packets = 0usize;

        loop {
            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(_)) => {
                    // Corrupt packet, keep going
                    skipped_packets += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            if channels == 0 {
                continue;
            }

            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buffer.copy_interleaved_ref(decoded);
            downmix_into(buffer.samples(), channels, &mut samples);
        }

        if skipped_packets > 0 {
            debug!(
                "file={} skipped {} undecodable packets",
                path.display(),
                skipped_packets
            );
        }

        if samples.is_empty() {
            return Err(PipelineError::DecodeError(format!(
                "no samples decoded from {}",
                path.display()
            )));
        }

        Ok(DecodedAudio {
            samples,
            sample_rate,
        })
    }
}

/// Average interleaved channels into mono samples
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels == 1 {
        out.extend_from_slice(interleaved);
        return;
    }

    let scale = 1.0 / channels as f32;
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with_suffix(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for n in 0..frames {
            for ch in 0..channels {
                let value = if ch == 0 { 8000 } else { -8000 };
                let value = if n % 2 == 0 { value } else { value / 2 };
                writer.write_sample(value as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_invalid_file() {
        let result = SymphoniaDecoder::new().decode(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[test]
    fn test_garbage_file() {
        let mut file = temp_with_suffix(".mp3");
        file.write_all(b"definitely not audio").unwrap();
        let result = SymphoniaDecoder::new().decode(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_mono_wav() {
        let file = temp_with_suffix(".wav");
        write_wav(file.path(), 1, 8000, 4000);

        let audio = SymphoniaDecoder::new().decode(file.path()).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.samples.len(), 4000);
        assert!(audio.samples[0] > 0.2);
    }

    #[test]
    fn test_decode_stereo_downmixes() {
        let file = temp_with_suffix(".wav");
        write_wav(file.path(), 2, 8000, 1000);

        let audio = SymphoniaDecoder::new().decode(file.path()).unwrap();
        assert_eq!(audio.samples.len(), 1000);
        // Opposite-polarity channels cancel out
        assert!(audio.samples.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn test_downmix_into() {
        let mut out = Vec::new();
        downmix_into(&[1.0, 0.0, 0.5, 0.5], 2, &mut out);
        assert_eq!(out, vec![0.5, 0.5]);
    }
}
