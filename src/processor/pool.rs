use super::aggregator::{Aggregator, RowSender};
use super::segment::{Segment, Segmenter};
use super::{FileStats, Pipeline};
use crate::core::{FeatureRow, Recording};
use crate::error::{PipelineError, PipelineResult};
use crate::features::FeatureExtractor;
use crate::sink::CsvSink;
use log::{debug, error, info, warn};
use std::path::Path;
use std::thread::{self, Scope, ScopedJoinHandle};

/// Decode `input`, fan its segments out to workers and append the rows to
/// `output`. Failures are logged here with label and file context.
pub fn process_file(
    pipeline: &Pipeline,
    label: &str,
    input: &Path,
    output: &Path,
) -> PipelineResult<FileStats> {
    let result = run_file(pipeline, label, input, output);
    match &result {
        Ok(stats) => info!(
            "label={} file={} done: {} rows written, {} dropped, {} short segments skipped",
            label,
            input.display(),
            stats.rows_written,
            stats.rows_failed,
            stats.segments_dropped
        ),
        Err(e) => warn!("label={} file={} skipped: {}", label, input.display(), e),
    }
    result
}

fn run_file(
    pipeline: &Pipeline,
    label: &str,
    input: &Path,
    output: &Path,
) -> PipelineResult<FileStats> {
    let config = pipeline.config();

    // Decoding: no sink is opened for a file that cannot be decoded
    let audio = pipeline.decoder().decode(input)?;
    let recording = Recording::new(label, input, audio)?;

    let segmenter = Segmenter::new(
        config.interval_samples(recording.sample_rate()),
        config.warmup_intervals,
        config.min_segment_samples,
    )?;
    let plan = segmenter.plan(recording.len());
    for segment in &plan.dropped {
        debug!(
            "label={} file={} segment={} dropped: {} samples below minimum {}",
            label,
            input.display(),
            segment.index,
            segment.len(),
            config.min_segment_samples
        );
    }

    let sink = CsvSink::append(output)?;
    let aggregator = Aggregator::spawn(
        Box::new(sink),
        config.channel_capacity,
        input.display().to_string(),
    )?;

    let mut stats = FileStats {
        segments_dropped: plan.dropped.len() as u64,
        ..FileStats::default()
    };

    debug!(
        "label={} file={} duration={:.1}s dispatching {} segments of {} samples at {} Hz",
        label,
        input.display(),
        recording.duration().as_secs_f64(),
        plan.retained.len(),
        segmenter.interval_samples(),
        recording.sample_rate()
    );
    dispatch(pipeline, &recording, &plan.retained, &aggregator, &mut stats);

    // Every worker has been joined, so no row can follow end of stream
    stats.rows_written = aggregator.finish().inspect_err(|e| {
        error!("label={} file={} aggregator failed: {}", label, input.display(), e)
    })?;

    drop(recording);
    Ok(stats)
}

type Wave<'scope> = Vec<(usize, ScopedJoinHandle<'scope, PipelineResult<()>>)>;

/// Run one worker per segment, at most `worker_limit` at a time.
///
/// When the limit is reached the whole wave is joined before more workers
/// start.
fn dispatch(
    pipeline: &Pipeline,
    recording: &Recording,
    segments: &[Segment],
    aggregator: &Aggregator,
    stats: &mut FileStats,
) {
    let limit = pipeline.config().worker_limit;
    let extractor = pipeline.extractor();
    let label = recording.label();
    let sample_rate = recording.sample_rate();

    thread::scope(|scope| {
        let mut wave: Wave<'_> = Vec::with_capacity(limit);

        for segment in segments {
            if wave.len() >= limit {
                drain(&mut wave, recording, stats);
            }

            let samples = recording.segment(segment);
            let sender = aggregator.sender();
            match spawn_worker(scope, segment.index, extractor, samples, sample_rate, label, sender) {
                Ok(handle) => {
                    stats.segments_dispatched += 1;
                    wave.push((segment.index, handle));
                }
                Err(e) => {
                    error!(
                        "label={} file={} segment={} not dispatched: {}",
                        label,
                        recording.path().display(),
                        segment.index,
                        e
                    );
                    stats.rows_failed += 1;
                }
            }
        }

        drain(&mut wave, recording, stats);
    });
}

fn spawn_worker<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    index: usize,
    extractor: &'env dyn FeatureExtractor,
    samples: &'env [f32],
    sample_rate: u32,
    label: &'env str,
    sender: RowSender,
) -> PipelineResult<ScopedJoinHandle<'scope, PipelineResult<()>>> {
    thread::Builder::new()
        .name(format!("segment-{index}"))
        .spawn_scoped(scope, move || {
            run_worker(extractor, samples, sample_rate, label, sender)
        })
        .map_err(|e| PipelineError::Worker(e.to_string()))
}

/// Extract one segment's features and forward the labelled row
fn run_worker(
    extractor: &dyn FeatureExtractor,
    samples: &[f32],
    sample_rate: u32,
    label: &str,
    sender: RowSender,
) -> PipelineResult<()> {
    let values = extractor.extract(samples, sample_rate)?;
    if values.len() != extractor.width() {
        return Err(PipelineError::FeatureWidth {
            expected: extractor.width(),
            got: values.len(),
        });
    }
    sender.send(FeatureRow::new(values, label))
}

/// Join every outstanding worker; failures drop their row only
fn drain(wave: &mut Wave<'_>, recording: &Recording, stats: &mut FileStats) {
    for (index, handle) in wave.drain(..) {
        match handle.join() {
            Ok(Ok(())) => stats.rows_sent += 1,
            Ok(Err(e)) => {
                warn!(
                    "label={} file={} segment={} row dropped: {}",
                    recording.label(),
                    recording.path().display(),
                    index,
                    e
                );
                stats.rows_failed += 1;
            }
            Err(_) => {
                error!(
                    "label={} file={} segment={} worker panicked",
                    recording.label(),
                    recording.path().display(),
                    index
                );
                stats.rows_failed += 1;
            }
        }
    }
}
