use crate::error::{PipelineError, PipelineResult};

/// A contiguous slice of a recording, by sample offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Interval index within the file
    pub index: usize,
    /// First sample (inclusive)
    pub start: usize,
    /// Last sample (exclusive)
    pub end: usize,
}

impl Segment {
    /// Number of samples covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the segment covers no samples
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Segments of one file split into the ones to dispatch and the dropped ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentPlan {
    /// Segments long enough to be dispatched
    pub retained: Vec<Segment>,
    /// Segments dropped for being shorter than the minimum length
    pub dropped: Vec<Segment>,
}

/// Fixed-length, non-overlapping interval planner
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    /// Samples per interval
    interval_samples: usize,
    /// Leading intervals to skip
    warmup_intervals: usize,
    /// Shorter segments are dropped
    min_samples: usize,
}

impl Segmenter {
    /// Create a new segmenter
    pub fn new(
        interval_samples: usize,
        warmup_intervals: usize,
        min_samples: usize,
    ) -> PipelineResult<Self> {
        if interval_samples == 0 {
            return Err(PipelineError::ConfigError(
                "interval must cover at least one sample".to_string(),
            ));
        }

        Ok(Segmenter {
            interval_samples,
            warmup_intervals,
            min_samples,
        })
    }

    /// Get the number of samples per interval
    pub fn interval_samples(&self) -> usize {
        self.interval_samples
    }

    /// All candidate intervals after the warm-up.
    ///
    /// Index `i` runs from the warm-up count up to and including
    /// `floor(total / interval)`. Every interval but the last spans exactly
    /// `interval_samples`; the last one runs to the end of the buffer and may
    /// be shorter, or empty when `total` is an exact multiple.
    pub fn intervals(&self, total_samples: usize) -> Vec<Segment> {
        let interval_count = total_samples / self.interval_samples;
        if self.warmup_intervals > interval_count {
            return Vec::new();
        }

        (self.warmup_intervals..=interval_count)
            .map(|index| {
                let start = index * self.interval_samples;
                let end = if index < interval_count {
                    start + self.interval_samples
                } else {
                    total_samples
                };
                Segment { index, start, end }
            })
            .collect()
    }

    /// Whether a segment is long enough to be dispatched
    pub fn retains(&self, segment: &Segment) -> bool {
        !segment.is_empty() && segment.len() >= self.min_samples
    }

    /// Split the candidate intervals into retained and dropped segments
    pub fn plan(&self, total_samples: usize) -> SegmentPlan {
        let (retained, dropped) = self
            .intervals(total_samples)
            .into_iter()
            .partition(|segment| self.retains(segment));
        SegmentPlan { retained, dropped }
    }
}
