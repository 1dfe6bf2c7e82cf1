use super::{CorpusReport, Pipeline};
use crate::error::{PipelineError, PipelineResult};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Label directories directly under `root`, sorted by name
pub fn list_labels(root: &Path) -> PipelineResult<Vec<(String, PathBuf)>> {
    let mut labels = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("dir={} unreadable entry skipped: {}", root.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            let label = entry.file_name().to_string_lossy().into_owned();
            labels.push((label, path));
        }
    }

    labels.sort();
    Ok(labels)
}

/// Process every label under `input_root`, mirroring it under `output_root`.
///
/// Only an unreadable input root is fatal; a failing label is logged and
/// counted as skipped.
pub fn walk(pipeline: &Pipeline, input_root: &Path, output_root: &Path) -> PipelineResult<CorpusReport> {
    let labels = list_labels(input_root)?;
    info!(
        "found {} labels under {}",
        labels.len(),
        input_root.display()
    );

    let mut report = CorpusReport::default();

    for (label, input_dir) in labels {
        let output_dir = output_root.join(&label);
        let result = fs::create_dir_all(&output_dir)
            .map_err(PipelineError::from)
            .and_then(|()| pipeline.process_label(&label, &input_dir, &output_dir));

        match result {
            Ok(label_report) => {
                if label_report.files_failed == 0 {
                    report.labels_completed += 1;
                } else {
                    report.labels_partial += 1;
                }
                report += label_report;
            }
            Err(e) => {
                warn!("label={} skipped: {}", label, e);
                report.labels_skipped += 1;
            }
        }
    }

    info!(
        "corpus done: {} labels completed, {} partial, {} skipped; {} files completed, {} failed; {} rows written, {} dropped",
        report.labels_completed,
        report.labels_partial,
        report.labels_skipped,
        report.files_completed,
        report.files_failed,
        report.stats.rows_written,
        report.stats.rows_failed
    );
    Ok(report)
}
