//! Command handler functions for the covview CLI.
//!
//! Handlers return their output as a `String`, making them easy to test
//! without capturing stdout.

use anyhow::{Context, Result};

use crate::report::{self, ReportConfig};

/// Generate the HTML report and describe the result in one line.
pub fn cmd_generate(config: &ReportConfig) -> Result<String> {
    let outcome = report::generate(config).with_context(|| {
        format!(
            "Failed to generate report from {}",
            config.profile.display()
        )
    })?;

    let corpus = &outcome.corpus;
    Ok(format!(
        "Generated coverage report for {:.2}% of statements ({} of {}) in {} files.\n",
        corpus.coverage_percent,
        corpus.covered_statements,
        corpus.total_statements,
        corpus.total_files,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_module(root: &Path) {
        fs::write(root.join("go.mod"), "module example.com/calc\n\ngo 1.22\n").unwrap();
        fs::write(
            root.join("calc.go"),
            "package calc\n\nfunc Add(a, b int) int {\n\treturn a + b\n}\n\nfunc Sub(a, b int) int {\n\treturn a - b\n}\n",
        )
        .unwrap();
        fs::write(
            root.join("coverage.out"),
            "mode: set\n\
             example.com/calc/calc.go:3.25,5.2 1 1\n\
             example.com/calc/calc.go:7.25,9.2 3 0\n",
        )
        .unwrap();
    }

    fn config(root: &Path) -> ReportConfig {
        ReportConfig {
            profile: root.join("coverage.out"),
            out_dir: root.join("html"),
            src_root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cmd_generate() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path());

        let out = cmd_generate(&config(dir.path())).unwrap();

        assert_eq!(
            out,
            "Generated coverage report for 25.00% of statements (1 of 4) in 1 files.\n"
        );
        assert!(dir.path().join("html/index.html").is_file());
        assert!(dir.path().join("html/tree/calc.html").is_file());
    }

    #[test]
    fn test_cmd_generate_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path());
        let mut cfg = config(dir.path());
        cfg.profile = dir.path().join("nope.out");

        let err = cmd_generate(&cfg).unwrap_err();
        assert!(format!("{err}").contains("Failed to generate report"));
    }
}
