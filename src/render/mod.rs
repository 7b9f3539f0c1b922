//! Static HTML output: an index page plus one annotated page per source file.
//!
//! Renderers return the page as a `String`; writing it out is the caller's
//! job. Assets are compiled into the binary.

pub mod file;
pub mod index;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Directory under the output root that holds the per-file pages.
pub const PAGES_DIR: &str = "tree";

const BASE_CSS: &str = include_str!("../../assets/base.css");
const INDEX_CSS: &str = include_str!("../../assets/index.css");
const INDEX_JS: &str = include_str!("../../assets/index.js");
const FILE_CSS: &str = include_str!("../../assets/file.css");
const FILE_JS: &str = include_str!("../../assets/file.js");

/// Write stylesheets and scripts for the index (into `out_dir`) and for the
/// file pages (into `out_dir/tree`).
pub fn write_assets(out_dir: &Path) -> Result<()> {
    let pages_dir = out_dir.join(PAGES_DIR);
    std::fs::create_dir_all(&pages_dir)?;

    std::fs::write(out_dir.join("style.css"), format!("{BASE_CSS}\n{INDEX_CSS}"))?;
    std::fs::write(out_dir.join("script.js"), INDEX_JS)?;
    std::fs::write(pages_dir.join("style.css"), format!("{BASE_CSS}\n{FILE_CSS}"))?;
    std::fs::write(pages_dir.join("script.js"), FILE_JS)?;
    Ok(())
}

/// HTML-escape text for element content and attribute values.
pub fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Page for a source file, relative to the pages directory.
/// `cart/cart.go` becomes `cart/cart.html`.
pub fn page_path(local_path: &str) -> String {
    Path::new(local_path)
        .with_extension("html")
        .to_string_lossy()
        .into_owned()
}

/// Where the page for `local_path` is written under `out_dir`.
pub fn page_file(out_dir: &Path, local_path: &str) -> PathBuf {
    out_dir.join(PAGES_DIR).join(page_path(local_path))
}

/// `../` once per directory level of `local_path`, to climb from a file's
/// page back to the pages directory.
pub fn relative_prefix(local_path: &str) -> String {
    "../".repeat(local_path.matches('/').count())
}

/// CSS class for a coverage percentage.
pub fn level_class(pct: f64) -> &'static str {
    if pct >= 80.0 {
        "high"
    } else if pct >= 50.0 {
        "medium"
    } else {
        "low"
    }
}
