//! Output sink implementations

/// Append-only CSV output
pub mod csv;

pub use self::csv::CsvSink;

use crate::core::FeatureRow;
use crate::error::PipelineResult;

/// Append-only destination for the feature rows of one file
pub trait Sink: Send {
    /// Write one row
    fn write_row(&mut self, row: &FeatureRow) -> PipelineResult<()>;

    /// Flush and close (no further writes accepted)
    fn finalize(&mut self) -> PipelineResult<()> {
        Ok(())
    }
}
