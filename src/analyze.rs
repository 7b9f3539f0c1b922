//! Per-file coverage metrics.
//!
//! Each profile entry is resolved to a source file under the module root,
//! classified line by line, and summarized into a [`FileMetrics`]. Files are
//! independent of each other, so [`analyze_all`] fans them out over a rayon
//! pool and collects one result per profile in profile order.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::classify::{classify, source_lines};
use crate::error::{CovviewError, Result};
use crate::model::{Counters, FileMetrics, FileProfile};
use crate::module;

/// Where source text comes from.
pub trait SourceProvider: Sync {
    /// Read the source for a path relative to the module root.
    fn read_source(&self, local_path: &str) -> io::Result<String>;
}

/// Sources on disk under a root directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for FsSource {
    fn read_source(&self, local_path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(local_path))
    }
}

/// Sources held in memory, keyed by local path.
impl SourceProvider for HashMap<String, String> {
    fn read_source(&self, local_path: &str) -> io::Result<String> {
        self.get(local_path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{local_path} not loaded"))
        })
    }
}

/// Metrics for one file along with the source text they were computed from,
/// so the report can render the file without reading it again.
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
    pub metrics: FileMetrics,
    pub source: String,
}

/// Analyze one profile entry.
///
/// Fails with [`CovviewError::ModuleMismatch`] when the file is not under
/// `module`, with [`CovviewError::InvalidPath`] when its module-relative path
/// would leave the module root, and with [`CovviewError::SourceUnavailable`]
/// when its source cannot be read. Callers skip such files and carry on with
/// the rest.
pub fn analyze(
    profile: &FileProfile,
    module: &str,
    sources: &dyn SourceProvider,
) -> Result<FileMetrics> {
    analyze_source(profile, module, sources).map(|analyzed| analyzed.metrics)
}

/// Like [`analyze`], but hands back the source text as well.
pub fn analyze_source(
    profile: &FileProfile,
    module: &str,
    sources: &dyn SourceProvider,
) -> Result<AnalyzedFile> {
    let local_path = module::local_path(&profile.file_name, module)?;
    let source = sources
        .read_source(&local_path)
        .map_err(|source| CovviewError::SourceUnavailable {
            path: local_path.clone(),
            source,
        })?;
    let metrics = file_metrics(profile, local_path, &source);
    Ok(AnalyzedFile { metrics, source })
}

/// Analyze every profile entry in parallel. The output has one entry per
/// profile, in the same order. Each source is read exactly once.
pub fn analyze_all(
    profiles: &[FileProfile],
    module: &str,
    sources: &dyn SourceProvider,
) -> Vec<Result<AnalyzedFile>> {
    profiles
        .par_iter()
        .map(|profile| analyze_source(profile, module, sources))
        .collect()
}

/// Compute metrics for a profile entry whose source text is already known.
pub fn file_metrics(profile: &FileProfile, local_path: String, text: &str) -> FileMetrics {
    let lines = source_lines(text);
    let per_line_status = classify(lines.len(), &profile.blocks).statuses();

    let mut counters = Counters::default();
    for status in per_line_status.iter().skip(1) {
        counters.record_line(*status);
    }
    // Statement totals come from the blocks themselves, clipped or not.
    for block in &profile.blocks {
        counters.total_statements = counters.total_statements.saturating_add(block.statements);
        if block.is_hit() {
            counters.covered_statements =
                counters.covered_statements.saturating_add(block.statements);
        }
    }

    FileMetrics {
        file_name: profile.file_name.clone(),
        local_path,
        coverage_percent: counters.coverage_percent(),
        counters,
        per_line_status,
    }
}
