//! End-to-end report generation: profile in, HTML directory out.
//!
//! Per-file failures (a file outside the module, a missing source) are
//! logged and skipped; only a run where nothing survives is an error.

use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;

use crate::analyze::{analyze_all, AnalyzedFile, FsSource, SourceProvider};
use crate::classify::source_lines;
use crate::error::{CovviewError, Result};
use crate::model::{CorpusMetrics, FileMetrics, FileProfile};
use crate::parsers::gocover;
use crate::tree::{self, TreeNode};
use crate::{module, render};

/// Everything a report run needs to know.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Go coverage profile to read.
    pub profile: PathBuf,
    /// Directory the HTML report is written to.
    pub out_dir: PathBuf,
    /// Module root on disk; must contain `go.mod`.
    pub src_root: PathBuf,
    /// Remove `out_dir` before writing.
    pub clean: bool,
    /// Also write files, totals and tree as JSON to this path.
    pub json: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            profile: PathBuf::from("coverage.out"),
            out_dir: PathBuf::from("coverage"),
            src_root: PathBuf::from("."),
            clean: false,
            json: None,
        }
    }
}

/// A profile entry that was left out of the report.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// What a report run produced.
#[derive(Debug)]
pub struct ReportOutcome {
    pub module: String,
    pub corpus: CorpusMetrics,
    /// Every HTML page written, index first.
    pub pages: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Serialize)]
struct JsonBundle<'a> {
    module: &'a str,
    files: &'a [FileMetrics],
    corpus: &'a CorpusMetrics,
    tree: &'a TreeNode<'a>,
}

/// Generate the report described by `config`.
pub fn generate(config: &ReportConfig) -> Result<ReportOutcome> {
    if config.clean {
        remove_dir(&config.out_dir)?;
    }

    let module = module::read(&config.src_root)?;
    debug!("module root is {module}");

    let content = std::fs::read(&config.profile)?;
    let profiles = gocover::parse(&content)?;
    debug!(
        "{} files in profile {}",
        profiles.len(),
        config.profile.display()
    );

    let sources = FsSource::new(&config.src_root);
    build_report(config, module, &profiles, &sources)
}

/// Analyze parsed profiles against `sources` and write the report.
pub fn build_report(
    config: &ReportConfig,
    module: String,
    profiles: &[FileProfile],
    sources: &dyn SourceProvider,
) -> Result<ReportOutcome> {
    let (analyzed, skipped) = collect_metrics(profiles, &module, sources);
    if analyzed.is_empty() {
        return Err(CovviewError::EmptyResultSet(
            config.profile.display().to_string(),
        ));
    }

    let (files, texts): (Vec<FileMetrics>, Vec<String>) = analyzed
        .into_iter()
        .map(|file| (file.metrics, file.source))
        .unzip();

    let corpus = CorpusMetrics::from_files(&files);
    let tree = tree::build(&files);
    let pages = write_pages(&config.out_dir, &module, &files, &texts, &corpus, &tree)?;

    if let Some(json_path) = &config.json {
        let bundle = JsonBundle {
            module: &module,
            files: &files,
            corpus: &corpus,
            tree: &tree,
        };
        std::fs::write(json_path, serde_json::to_vec_pretty(&bundle)?)?;
        info!("Wrote {}", json_path.display());
    }

    Ok(ReportOutcome {
        module,
        corpus,
        pages,
        skipped,
    })
}

/// Analyze every profile entry, splitting the results into analyzed files
/// and skipped files. Analyzed files keep profile order.
pub fn collect_metrics(
    profiles: &[FileProfile],
    module: &str,
    sources: &dyn SourceProvider,
) -> (Vec<AnalyzedFile>, Vec<SkippedFile>) {
    let mut files = Vec::with_capacity(profiles.len());
    let mut skipped = Vec::new();

    for (profile, result) in profiles.iter().zip(analyze_all(profiles, module, sources)) {
        match result {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("skipping {}: {}", profile.file_name, e);
                skipped.push(SkippedFile {
                    file_name: profile.file_name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (files, skipped)
}

fn write_pages(
    out_dir: &Path,
    module: &str,
    files: &[FileMetrics],
    texts: &[String],
    corpus: &CorpusMetrics,
    tree: &TreeNode<'_>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    render::write_assets(out_dir)?;

    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let index_path = out_dir.join("index.html");
    std::fs::write(
        &index_path,
        render::index::render(corpus, files, tree, module, &generated_at)?,
    )?;

    let mut pages = vec![index_path];
    for (metrics, text) in files.iter().zip(texts) {
        let html = render::file::render(metrics, &source_lines(text));

        let path = render::page_file(out_dir, &metrics.local_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, html)?;
        info!("Generated {}", path.display());
        pages.push(path);
    }

    Ok(pages)
}

/// Remove a directory tree; a directory that is already gone is fine.
fn remove_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
