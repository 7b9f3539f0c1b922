/// Parser for Go's `-coverprofile` format.
///
/// Reference: https://go.dev/blog/cover
///
/// Format:
///   mode: set|count|atomic
///   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStatements> <count>
///
/// Each line describes a basic block (a range of source lines) with the number
/// of statements in the block and how many times it was executed. Blocks are
/// kept as blocks; turning them into per-line states is the classifier's job.
use std::collections::HashMap;
use std::io::BufRead;

use crate::error::{CovviewError, Result};
use crate::model::{CoverageBlock, FileProfile, ProfileMode};

/// Parse a Go coverage profile from raw bytes.
pub fn parse(input: &[u8]) -> Result<Vec<FileProfile>> {
    let mut profiles = Vec::new();
    parse_streaming_reader(&mut &*input, &mut |profile| {
        profiles.push(profile);
        Ok(())
    })?;
    Ok(profiles)
}

/// A block as written in the profile, columns included. Columns only matter
/// for spotting duplicates.
#[derive(Debug, Clone, Copy)]
struct RawBlock {
    start_line: u32,
    start_col: u32,
    end_line: u32,
    end_col: u32,
    statements: u64,
    hits: u64,
}

impl RawBlock {
    fn position(&self) -> (u32, u32, u32, u32) {
        (self.start_line, self.start_col, self.end_line, self.end_col)
    }

    fn into_block(self) -> CoverageBlock {
        CoverageBlock {
            start_line: self.start_line,
            end_line: self.end_line,
            statements: self.statements,
            hits: self.hits,
        }
    }
}

/// Parse `<line>.<col>`.
fn parse_position(s: &str) -> Option<(u32, u32)> {
    let (line, col) = s.split_once('.')?;
    Some((line.parse().ok()?, col.parse().ok()?))
}

/// Parse a single block line, returning (file_path, block).
///
/// Format: `<file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>`
fn parse_block_line(line: &str) -> Option<(&str, RawBlock)> {
    // The range never contains a colon, so the last one splits the file path
    // from the block. Paths with colons in them survive.
    let colon_pos = line.rfind(':')?;

    let file = &line[..colon_pos];
    let rest = &line[colon_pos + 1..];
    if file.is_empty() {
        return None;
    }

    // rest = "startLine.startCol,endLine.endCol numStmt count"
    let (range, tail) = rest.split_once(' ')?;
    let (start, end) = range.split_once(',')?;
    let (start_line, start_col) = parse_position(start)?;
    let (end_line, end_col) = parse_position(end)?;
    if start_line == 0 || end_line < start_line {
        return None;
    }

    let mut parts = tail.split_whitespace();
    let statements: u64 = parts.next()?.parse().ok()?;
    let hits: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some((
        file,
        RawBlock {
            start_line,
            start_col,
            end_line,
            end_col,
            statements,
            hits,
        },
    ))
}

/// Sort blocks by position and fold exact duplicates into one. Profiles from
/// `-coverpkg` runs repeat a block once per test binary that loaded it; the
/// copies must agree on the statement count.
fn merge_blocks(
    file: &str,
    mut blocks: Vec<RawBlock>,
    mode: ProfileMode,
) -> Result<Vec<CoverageBlock>> {
    blocks.sort_by_key(RawBlock::position);

    let mut merged: Vec<RawBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.position() == block.position() => {
                if last.statements != block.statements {
                    let (sl, sc, el, ec) = block.position();
                    return Err(CovviewError::Parse(format!(
                        "{}:{}.{},{}.{}: inconsistent statement count ({} and {})",
                        file, sl, sc, el, ec, last.statements, block.statements
                    )));
                }
                last.hits = match mode {
                    ProfileMode::Set => last.hits.max(block.hits),
                    ProfileMode::Count | ProfileMode::Atomic => {
                        last.hits.saturating_add(block.hits)
                    }
                };
            }
            _ => merged.push(block),
        }
    }

    Ok(merged.into_iter().map(RawBlock::into_block).collect())
}

/// Streaming Go coverage parser. Collects all blocks per file, then emits
/// once per source file in the order files first appear.
pub fn parse_streaming_reader(
    reader: &mut dyn BufRead,
    emit: &mut dyn FnMut(FileProfile) -> Result<()>,
) -> Result<()> {
    let mut mode: Option<ProfileMode> = None;
    let mut file_order: Vec<String> = Vec::new();
    let mut file_blocks: HashMap<String, Vec<RawBlock>> = HashMap::new();

    let mut raw_line = String::new();
    let mut line_no = 0usize;
    loop {
        raw_line.clear();
        let n = reader.read_line(&mut raw_line)?;
        if n == 0 {
            break;
        }
        line_no += 1;

        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(value) = line.strip_prefix("mode:") {
            let Ok(parsed) = value.trim().parse::<ProfileMode>() else {
                return Err(CovviewError::Parse(format!(
                    "line {}: unknown mode '{}'",
                    line_no,
                    value.trim()
                )));
            };
            // Concatenated profiles repeat the header; it has to agree.
            match mode {
                Some(existing) if existing != parsed => {
                    return Err(CovviewError::Parse(format!(
                        "line {}: mode '{}' conflicts with earlier mode '{}'",
                        line_no, parsed, existing
                    )));
                }
                _ => mode = Some(parsed),
            }
            continue;
        }

        let Some((file, block)) = parse_block_line(line) else {
            return Err(CovviewError::Parse(format!(
                "line {}: malformed coverage block: {}",
                line_no, line
            )));
        };

        if !file_blocks.contains_key(file) {
            file_order.push(file.to_string());
        }
        file_blocks.entry(file.to_string()).or_default().push(block);
    }

    let mode = mode.unwrap_or_default();
    for file_name in file_order {
        if let Some(blocks) = file_blocks.remove(&file_name) {
            let blocks = merge_blocks(&file_name, blocks, mode)?;
            emit(FileProfile {
                file_name,
                mode,
                blocks,
            })?;
        }
    }

    Ok(())
}
