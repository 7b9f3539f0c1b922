//! Per-line classification of coverage blocks.
//!
//! Every block adds its statement count to each line it spans; covered
//! blocks also add it to the line's covered tally. Overlapping blocks on one
//! line accumulate, they are not deduplicated.

use crate::model::{CoverageBlock, LineStatus};

/// Split source text into lines, dropping trailing empty lines.
pub fn source_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Statement tallies for one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTally {
    pub statements: u64,
    pub covered: u64,
}

impl LineTally {
    pub fn status(&self) -> LineStatus {
        if self.statements == 0 {
            LineStatus::NotTracked
        } else if self.covered == 0 {
            LineStatus::Missed
        } else if self.covered >= self.statements {
            LineStatus::Covered
        } else {
            LineStatus::Partial
        }
    }
}

/// Tallies for lines `1..=line_count`; slot 0 is a sentinel.
#[derive(Debug, Clone)]
pub struct LineTallies {
    tallies: Vec<LineTally>,
}

impl LineTallies {
    pub fn line_count(&self) -> usize {
        self.tallies.len() - 1
    }

    /// Tally for a 1-based line, or `None` outside the file.
    pub fn get(&self, line: usize) -> Option<LineTally> {
        if line == 0 {
            return None;
        }
        self.tallies.get(line).copied()
    }

    pub fn status(&self, line: usize) -> LineStatus {
        self.get(line)
            .map(|t| t.status())
            .unwrap_or(LineStatus::NotTracked)
    }

    /// One status per line, index 0 included as `NotTracked`.
    pub fn statuses(&self) -> Vec<LineStatus> {
        self.tallies.iter().map(LineTally::status).collect()
    }
}

/// Spread `blocks` over a file of `line_count` lines.
///
/// Block ranges running past the end of the file are clipped, so a profile
/// that is slightly out of date with the source still renders.
pub fn classify(line_count: usize, blocks: &[CoverageBlock]) -> LineTallies {
    let mut tallies = vec![LineTally::default(); line_count + 1];

    for block in blocks {
        let start = (block.start_line as usize).max(1);
        let end = (block.end_line as usize).min(line_count);
        for tally in tallies.iter_mut().take(end + 1).skip(start) {
            tally.statements = tally.statements.saturating_add(block.statements);
            if block.is_hit() {
                tally.covered = tally.covered.saturating_add(block.statements);
            }
        }
    }

    LineTallies { tallies }
}
