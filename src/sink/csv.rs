use crate::core::FeatureRow;
use crate::error::{PipelineError, PipelineResult};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Headerless CSV sink opened in append mode
pub struct CsvSink {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
}

impl CsvSink {
    /// Open (creating if needed) a CSV file for appending
    pub fn append<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PipelineError::SinkError(format!("cannot open {}: {}", path.display(), e)))?;

        Ok(CsvSink {
            writer: Some(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }
}

impl super::Sink for CsvSink {
    fn write_row(&mut self, row: &FeatureRow) -> PipelineResult<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PipelineError::SinkError("Sink already finalized".to_string()))?;

        let mut line = String::new();
        for value in &row.values {
            line.push_str(&value.to_string());
            line.push(',');
        }
        line.push_str(&escape_field(&row.label));
        line.push('\n');

        writer
            .write_all(line.as_bytes())
            .map_err(|e| PipelineError::SinkError(format!("{}: {}", self.path.display(), e)))?;

        Ok(())
    }

    fn finalize(&mut self) -> PipelineResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| PipelineError::SinkError(format!("{}: {}", self.path.display(), e)))?;
        }
        Ok(())
    }
}

/// Quote a field containing separators, quotes or line breaks
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Sink;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_csv_sink_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.csv");

        let mut sink = CsvSink::append(&path).unwrap();
        sink.write_row(&FeatureRow::new(vec![0.5, -1.0, 2.25], "rock"))
            .unwrap();
        sink.write_row(&FeatureRow::new(vec![1.0, 0.0, 3.0], "rock"))
            .unwrap();
        sink.finalize().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0.5,-1,2.25,rock\n1,0,3,rock\n");
    }

    #[test]
    fn test_csv_sink_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.csv");

        for _ in 0..2 {
            let mut sink = CsvSink::append(&path).unwrap();
            sink.write_row(&FeatureRow::new(vec![1.0], "pop")).unwrap();
            sink.finalize().unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_csv_sink_write_after_finalize() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::append(dir.path().join("a.csv")).unwrap();
        sink.finalize().unwrap();

        let result = sink.write_row(&FeatureRow::new(vec![1.0], "pop"));
        assert!(matches!(result, Err(PipelineError::SinkError(_))));
    }

    #[test]
    fn test_csv_sink_missing_directory() {
        let dir = tempdir().unwrap();
        let result = CsvSink::append(dir.path().join("missing").join("a.csv"));
        assert!(matches!(result, Err(PipelineError::SinkError(_))));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("hip hop"), "hip hop");
        assert_eq!(escape_field("rock,roll"), "\"rock,roll\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
