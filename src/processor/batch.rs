use super::{LabelReport, Pipeline};
use crate::error::PipelineResult;
use log::{debug, error, info, warn};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::thread;

/// A file scheduled for processing with its on-disk size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Source path
    pub path: PathBuf,
    /// On-disk size in bytes, used as the memory estimate
    pub size: u64,
    /// Destination CSV, set by `assign_outputs`
    pub output: PathBuf,
}

impl FileEntry {
    /// Create an entry with no output assigned yet
    pub fn new<P: Into<PathBuf>>(path: P, size: u64) -> Self {
        FileEntry {
            path: path.into(),
            size,
            output: PathBuf::new(),
        }
    }
}

/// Groups files into batches bounded by cumulative size and file count
#[derive(Debug)]
pub struct FileBatcher {
    size_limit: u64,
    file_limit: usize,
    current: Vec<FileEntry>,
    current_size: u64,
}

impl FileBatcher {
    /// Create a batcher
    pub fn new(size_limit: u64, file_limit: usize) -> Self {
        FileBatcher {
            size_limit,
            file_limit: file_limit.max(1),
            current: Vec::new(),
            current_size: 0,
        }
    }

    /// Add a file to the open batch.
    ///
    /// If the file would push the open batch over either limit, the open
    /// batch is closed and returned and the file starts the next one. A file
    /// larger than the size limit still gets a batch of its own.
    pub fn push(&mut self, entry: FileEntry) -> Option<Vec<FileEntry>> {
        let over_size = self.current_size.saturating_add(entry.size) > self.size_limit;
        let over_count = self.current.len() >= self.file_limit;

        let closed = if !self.current.is_empty() && (over_size || over_count) {
            self.current_size = 0;
            Some(mem::take(&mut self.current))
        } else {
            None
        };

        self.current_size = self.current_size.saturating_add(entry.size);
        self.current.push(entry);
        closed
    }

    /// Close and return the open batch, if any
    pub fn finish(&mut self) -> Option<Vec<FileEntry>> {
        self.current_size = 0;
        if self.current.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.current))
        }
    }

    /// Cumulative size of the open batch
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Files in the open batch
    pub fn current_len(&self) -> usize {
        self.current.len()
    }
}

/// Split `files` into batches the way `FileBatcher` would
pub fn plan_batches(files: Vec<FileEntry>, size_limit: u64, file_limit: usize) -> Vec<Vec<FileEntry>> {
    let mut batcher = FileBatcher::new(size_limit, file_limit);
    let mut batches: Vec<Vec<FileEntry>> = files
        .into_iter()
        .filter_map(|entry| batcher.push(entry))
        .collect();
    batches.extend(batcher.finish());
    batches
}

/// Regular files directly inside `dir`, sorted by name
pub fn list_files(dir: &Path) -> PipelineResult<Vec<FileEntry>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("dir={} unreadable entry skipped: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        match entry.metadata() {
            Ok(metadata) if metadata.is_file() => files.push(FileEntry::new(path, metadata.len())),
            Ok(_) => debug!("path={} is not a regular file, skipped", path.display()),
            Err(e) => warn!("file={} skipped, cannot stat: {}", path.display(), e),
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn file_stem(input: &Path) -> OsString {
    input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("output"))
}

/// Output file for `input` inside `output_dir`: its stem with a `.csv`
/// extension, or its full file name when `keep_extension` is set
pub fn output_path(output_dir: &Path, input: &Path, keep_extension: bool) -> PathBuf {
    let mut name = match input.file_name() {
        Some(file_name) if keep_extension => file_name.to_os_string(),
        _ => file_stem(input),
    };
    name.push(".csv");
    output_dir.join(name)
}

/// Give every file of a label its own output inside `output_dir`.
///
/// Files are named after their stem unless another file shares it, in which
/// case the full file name is kept (`a.mp3` -> `a.mp3.csv`). Files whose
/// output would still clash with an earlier one are returned second.
pub fn assign_outputs(output_dir: &Path, files: Vec<FileEntry>) -> (Vec<FileEntry>, Vec<FileEntry>) {
    let mut stems: HashMap<OsString, usize> = HashMap::new();
    for entry in &files {
        *stems.entry(file_stem(&entry.path)).or_default() += 1;
    }

    let mut taken = HashSet::new();
    let mut assigned = Vec::with_capacity(files.len());
    let mut clashing = Vec::new();

    for mut entry in files {
        let shared = stems.get(&file_stem(&entry.path)).is_some_and(|&n| n > 1);
        let output = output_path(output_dir, &entry.path, shared);
        if taken.insert(output.clone()) {
            entry.output = output;
            assigned.push(entry);
        } else {
            clashing.push(entry);
        }
    }

    (assigned, clashing)
}

/// Run every file of one label, batch after batch
pub fn process_label(
    pipeline: &Pipeline,
    label: &str,
    input_dir: &Path,
    output_dir: &Path,
) -> PipelineResult<LabelReport> {
    let config = pipeline.config();
    let (files, clashing) = assign_outputs(output_dir, list_files(input_dir)?);
    let mut batcher = FileBatcher::new(config.batch_size_limit, config.batch_file_limit);
    let mut report = LabelReport::default();

    for entry in &clashing {
        warn!(
            "label={} file={} skipped: output name already used by another file",
            label,
            entry.path.display()
        );
        report.files_failed += 1;
    }

    for entry in files {
        if let Some(batch) = batcher.push(entry) {
            run_batch(pipeline, label, &batch, &mut report);
        }
    }
    if let Some(batch) = batcher.finish() {
        run_batch(pipeline, label, &batch, &mut report);
    }

    info!(
        "label={} done: {} files completed, {} failed, {} rows written in {} batches",
        label, report.files_completed, report.files_failed, report.stats.rows_written, report.batches
    );
    Ok(report)
}

/// Process all files of a batch concurrently and wait for every one
fn run_batch(
    pipeline: &Pipeline,
    label: &str,
    batch: &[FileEntry],
    report: &mut LabelReport,
) {
    let total_size: u64 = batch.iter().map(|entry| entry.size).sum();
    debug!(
        "label={} starting batch of {} files, {} bytes",
        label,
        batch.len(),
        total_size
    );
    report.batches += 1;

    thread::scope(|scope| {
        let handles: Vec<_> = batch
            .iter()
            .map(|entry| {
                let spawned = thread::Builder::new()
                    .name(format!("file:{}", entry.path.display()))
                    .spawn_scoped(scope, move || {
                        pipeline.process_file(label, &entry.path, &entry.output)
                    });
                (entry, spawned)
            })
            .collect();

        for (entry, spawned) in handles {
            let joined = match spawned {
                Ok(handle) => handle.join(),
                Err(e) => {
                    error!("label={} file={} not started: {}", label, entry.path.display(), e);
                    report.files_failed += 1;
                    continue;
                }
            };
            match joined {
                Ok(Ok(stats)) => {
                    report.files_completed += 1;
                    report.stats += stats;
                }
                // Already logged by the file pipeline
                Ok(Err(_)) => report.files_failed += 1,
                Err(_) => {
                    error!("label={} file={} pipeline panicked", label, entry.path.display());
                    report.files_failed += 1;
                }
            }
        }
    });
}
