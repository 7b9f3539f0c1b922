//! Module root discovery and module-relative paths.
//!
//! Profiles name files by import path (`example.com/shop/cart/cart.go`);
//! sources live under the module root on disk (`cart/cart.go`).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CovviewError, Result};

/// `module <path>` directive, optionally quoted, optionally followed by a
/// line comment.
static MODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*module\s+"?([^"\s]+)"?\s*(?://.*)?$"#).unwrap()
});

/// Read `go.mod` under `src_root` and return the module path.
pub fn read(src_root: &Path) -> Result<String> {
    let go_mod = std::fs::read_to_string(src_root.join("go.mod"))?;
    parse(&go_mod)
}

/// Extract the module path from the contents of a `go.mod` file.
pub fn parse(go_mod: &str) -> Result<String> {
    MODULE_RE
        .captures(go_mod)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CovviewError::Parse("no module directive in go.mod".to_string()))
}

/// Path of `file_name` relative to the module root.
///
/// The match is per path segment: module `example.com/pro` does not own
/// `example.com/project/main.go`.
pub fn local_path(file_name: &str, module: &str) -> Result<String> {
    let module_root = module.trim_end_matches('/');
    let rest = if module_root.is_empty() {
        file_name.strip_prefix('/')
    } else {
        file_name
            .strip_prefix(module_root)
            .and_then(|rest| rest.strip_prefix('/'))
    };

    let rest = match rest {
        Some(rest) if !rest.is_empty() => rest,
        _ => {
            return Err(CovviewError::ModuleMismatch {
                file: file_name.to_string(),
                module: module.to_string(),
            })
        }
    };

    check_relative(rest).map_err(|reason| CovviewError::InvalidPath {
        file: file_name.to_string(),
        reason,
    })?;
    Ok(rest.to_string())
}

/// A local path is joined onto both the source root and the output
/// directory, so it must stay below them.
fn check_relative(path: &str) -> std::result::Result<(), &'static str> {
    if path.starts_with('/') {
        return Err("absolute path");
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err("empty path segment"),
            ".." => return Err("parent directory component"),
            _ => {}
        }
    }
    Ok(())
}
