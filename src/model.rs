//! Uniform in-memory representation of a coverage run: the blocks a profile
//! parser produces, the per-file metrics computed from them, and the
//! aggregates the report is rendered from.
//!
//! Everything here serializes with the camelCase field names the report
//! templates and the `--json` bundle use.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Coverage percentage rounded to two decimals, half away from zero.
/// Returns 0.0 when the total is zero.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = covered as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// A contiguous line range from a coverage profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageBlock {
    pub start_line: u32,
    pub end_line: u32,
    #[serde(rename = "statementCount")]
    pub statements: u64,
    #[serde(rename = "hitCount")]
    pub hits: u64,
}

impl CoverageBlock {
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.hits > 0
    }
}

/// How hit counts in a profile were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileMode {
    #[default]
    Set,
    Count,
    Atomic,
}

impl ProfileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileMode::Set => "set",
            ProfileMode::Count => "count",
            ProfileMode::Atomic => "atomic",
        }
    }
}

impl std::str::FromStr for ProfileMode {
    type Err = crate::error::CovviewError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "set" => Ok(ProfileMode::Set),
            "count" => Ok(ProfileMode::Count),
            "atomic" => Ok(ProfileMode::Atomic),
            _ => Err(crate::error::CovviewError::Parse(format!(
                "Unknown profile mode: '{}'. Supported: set, count, atomic",
                s
            ))),
        }
    }
}

impl fmt::Display for ProfileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All blocks a profile reports for one source file.
#[derive(Debug, Clone, Default)]
pub struct FileProfile {
    pub file_name: String,
    pub mode: ProfileMode,
    pub blocks: Vec<CoverageBlock>,
}

impl FileProfile {
    pub fn new(file_name: String) -> Self {
        Self {
            file_name,
            ..Default::default()
        }
    }
}

/// Execution status of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStatus {
    /// No block touches the line (blank lines, comments, braces).
    #[default]
    NotTracked,
    Missed,
    Partial,
    Covered,
}

impl LineStatus {
    /// CSS class used for the line on a source page.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::NotTracked => "not-tracked",
            LineStatus::Missed => "missed",
            LineStatus::Partial => "partial",
            LineStatus::Covered => "covered",
        }
    }

    /// Gutter marker shown next to lines that need attention.
    pub fn marker(&self) -> &'static str {
        match self {
            LineStatus::Partial => "!",
            LineStatus::Missed => "!!",
            LineStatus::NotTracked | LineStatus::Covered => "",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive line and statement counters shared by files and directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub tracked_lines: u64,
    pub covered_lines: u64,
    pub partial_lines: u64,
    pub missed_lines: u64,
    pub total_statements: u64,
    pub covered_statements: u64,
}

impl Counters {
    /// Count one classified line.
    pub fn record_line(&mut self, status: LineStatus) {
        match status {
            LineStatus::NotTracked => return,
            LineStatus::Missed => self.missed_lines += 1,
            LineStatus::Partial => self.partial_lines += 1,
            LineStatus::Covered => self.covered_lines += 1,
        }
        self.tracked_lines += 1;
    }

    #[must_use]
    pub fn coverage_percent(&self) -> f64 {
        percent(self.covered_statements, self.total_statements)
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, rhs: Self) {
        self.tracked_lines += rhs.tracked_lines;
        self.covered_lines += rhs.covered_lines;
        self.partial_lines += rhs.partial_lines;
        self.missed_lines += rhs.missed_lines;
        self.total_statements += rhs.total_statements;
        self.covered_statements += rhs.covered_statements;
    }
}

impl Add for Counters {
    type Output = Counters;

    fn add(mut self, rhs: Self) -> Counters {
        self += rhs;
        self
    }
}

impl Sum for Counters {
    fn sum<I: Iterator<Item = Counters>>(iter: I) -> Counters {
        iter.fold(Counters::default(), Add::add)
    }
}

/// Coverage metrics for a single analyzed source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetrics {
    /// Module-qualified name as reported by the profile.
    pub file_name: String,
    /// Path relative to the source root.
    pub local_path: String,
    #[serde(flatten)]
    pub counters: Counters,
    pub coverage_percent: f64,
    /// One entry per source line; index 0 is an unused sentinel.
    pub per_line_status: Vec<LineStatus>,
}

impl FileMetrics {
    /// Number of source lines the statuses were computed over.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.per_line_status.len().saturating_sub(1)
    }

    /// Status of a 1-based line; out-of-range lines are not tracked.
    #[must_use]
    pub fn status(&self, line: usize) -> LineStatus {
        if line == 0 {
            return LineStatus::NotTracked;
        }
        self.per_line_status
            .get(line)
            .copied()
            .unwrap_or(LineStatus::NotTracked)
    }
}

/// Grand total over every file in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusMetrics {
    pub total_files: usize,
    pub total_statements: u64,
    pub covered_statements: u64,
    pub coverage_percent: f64,
}

impl CorpusMetrics {
    /// Sum statements over all files and derive the percentage from the sums,
    /// so large files weigh more than small ones.
    pub fn from_files(files: &[FileMetrics]) -> Self {
        let total_statements = files.iter().map(|f| f.counters.total_statements).sum();
        let covered_statements = files.iter().map(|f| f.counters.covered_statements).sum();
        Self {
            total_files: files.len(),
            total_statements,
            covered_statements,
            coverage_percent: percent(covered_statements, total_statements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(total: u64, covered: u64) -> FileMetrics {
        FileMetrics {
            file_name: "example.com/m/f.go".to_string(),
            local_path: "f.go".to_string(),
            counters: Counters {
                total_statements: total,
                covered_statements: covered,
                ..Default::default()
            },
            coverage_percent: percent(covered, total),
            per_line_status: vec![LineStatus::NotTracked],
        }
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn test_percent_rounds_to_two_decimals() {
        assert_eq!(percent(1, 3), 33.33);
        assert_eq!(percent(2, 3), 66.67);
        assert_eq!(percent(3, 3), 100.0);
    }

    #[test]
    fn test_percent_ties_round_away_from_zero() {
        // 1/32 is exactly 3.125; round-half-to-even would give 3.12.
        assert_eq!(percent(1, 32), 3.13);
        // 1/16 is exactly 6.25, already two decimals.
        assert_eq!(percent(1, 16), 6.25);
    }

    #[test]
    fn test_line_status_text() {
        assert_eq!(LineStatus::NotTracked.as_str(), "not-tracked");
        assert_eq!(LineStatus::Missed.to_string(), "missed");
        assert_eq!(LineStatus::Partial.marker(), "!");
        assert_eq!(LineStatus::Missed.marker(), "!!");
        assert_eq!(LineStatus::Covered.marker(), "");
    }

    #[test]
    fn test_counters_record_line() {
        let mut c = Counters::default();
        for s in [
            LineStatus::NotTracked,
            LineStatus::Missed,
            LineStatus::Partial,
            LineStatus::Covered,
            LineStatus::Covered,
        ] {
            c.record_line(s);
        }
        assert_eq!(c.tracked_lines, 4);
        assert_eq!(c.covered_lines, 2);
        assert_eq!(c.partial_lines, 1);
        assert_eq!(c.missed_lines, 1);
    }

    #[test]
    fn test_counters_sum() {
        let a = Counters {
            tracked_lines: 3,
            covered_lines: 3,
            total_statements: 2,
            covered_statements: 2,
            ..Default::default()
        };
        let b = Counters {
            tracked_lines: 1,
            missed_lines: 1,
            total_statements: 1,
            ..Default::default()
        };
        let sum: Counters = [a, b].into_iter().sum();
        assert_eq!(sum.tracked_lines, 4);
        assert_eq!(sum.missed_lines, 1);
        assert_eq!(sum.total_statements, 3);
        assert_eq!(sum.coverage_percent(), 66.67);
    }

    #[test]
    fn test_corpus_empty() {
        let corpus = CorpusMetrics::from_files(&[]);
        assert_eq!(corpus.total_files, 0);
        assert_eq!(corpus.coverage_percent, 0.0);
    }

    #[test]
    fn test_corpus_uses_summed_statements() {
        // 1/1 and 1/9: mean of percentages is 55.56, summed is 2/10.
        let files = vec![metrics(1, 1), metrics(9, 1)];
        let corpus = CorpusMetrics::from_files(&files);
        assert_eq!(corpus.total_files, 2);
        assert_eq!(corpus.total_statements, 10);
        assert_eq!(corpus.covered_statements, 2);
        assert_eq!(corpus.coverage_percent, 20.0);

        let mean = files.iter().map(|f| f.coverage_percent).sum::<f64>() / 2.0;
        assert!((mean - corpus.coverage_percent).abs() > 1.0);
    }

    #[test]
    fn test_file_metrics_status_out_of_range() {
        let mut m = metrics(1, 1);
        m.per_line_status = vec![LineStatus::NotTracked, LineStatus::Covered];
        assert_eq!(m.line_count(), 1);
        assert_eq!(m.status(0), LineStatus::NotTracked);
        assert_eq!(m.status(1), LineStatus::Covered);
        assert_eq!(m.status(2), LineStatus::NotTracked);
    }

    #[test]
    fn test_file_metrics_serializes_flat_camel_case() {
        let mut m = metrics(2, 1);
        m.per_line_status = vec![LineStatus::NotTracked, LineStatus::Partial];
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["fileName"], "example.com/m/f.go");
        assert_eq!(json["localPath"], "f.go");
        assert_eq!(json["totalStatements"], 2);
        assert_eq!(json["coveredStatements"], 1);
        assert_eq!(json["coveragePercent"], 50.0);
        assert_eq!(json["perLineStatus"][1], "partial");
    }
}
