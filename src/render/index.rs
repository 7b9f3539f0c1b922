//! The report's landing page: corpus totals and the directory tree.
//!
//! The page carries the tree and the file metrics as embedded JSON. The
//! script drills into directories with a breadcrumb and draws a donut chart
//! of the current directory; the server-rendered table is what shows when
//! scripts are off.

use std::fmt::Write;

use serde::Serialize;

use super::{escape, level_class, page_path, PAGES_DIR};
use crate::error::Result;
use crate::model::{CorpusMetrics, FileMetrics};
use crate::tree::TreeNode;

const COLUMNS: [&str; 7] = [
    "Name",
    "Coverage",
    "Statements",
    "Lines",
    "Covered",
    "Partial",
    "Missed",
];

/// Render `index.html`.
pub fn render(
    corpus: &CorpusMetrics,
    files: &[FileMetrics],
    tree: &TreeNode<'_>,
    module: &str,
    generated_at: &str,
) -> Result<String> {
    let tree_json = script_json(tree)?;
    let files_json = script_json(files)?;
    let module = escape(module);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    writeln!(out, "<title>{module} - coverage</title>").unwrap();
    out.push_str("<link rel=\"stylesheet\" href=\"style.css\">\n");
    out.push_str("</head>\n<body>\n<header>\n");
    writeln!(out, "<h1>{module}</h1>").unwrap();
    writeln!(
        out,
        "<div class=\"summary {level}\">{pct:.2}% of statements ({covered} of {total}) \
         in {files} files</div>",
        level = level_class(corpus.coverage_percent),
        pct = corpus.coverage_percent,
        covered = corpus.covered_statements,
        total = corpus.total_statements,
        files = corpus.total_files,
    )
    .unwrap();
    out.push_str("</header>\n<main class=\"overview\">\n");
    out.push_str(
        "<svg id=\"donut\" viewBox=\"-160 -160 320 320\" role=\"img\" \
         aria-label=\"Coverage of the current directory\"></svg>\n",
    );
    out.push_str("<section class=\"browser\">\n");
    writeln!(out, "<nav id=\"breadcrumb\" data-root=\"{module}\"></nav>").unwrap();
    out.push_str("<input id=\"filter\" type=\"search\" placeholder=\"Filter files\">\n");
    out.push_str("<div id=\"file-browser\">\n<table class=\"tree\">\n<thead>\n<tr>");
    for heading in COLUMNS {
        write!(out, "<th>{heading}</th>").unwrap();
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for child in &tree.children {
        render_node(&mut out, child, 0);
    }

    out.push_str("</tbody>\n</table>\n</div>\n</section>\n</main>\n");
    writeln!(
        out,
        "<footer>Generated {} by covview {}</footer>",
        escape(generated_at),
        env!("CARGO_PKG_VERSION")
    )
    .unwrap();
    writeln!(
        out,
        "<script type=\"application/json\" id=\"tree-data\">{tree_json}</script>"
    )
    .unwrap();
    writeln!(
        out,
        "<script type=\"application/json\" id=\"files-data\">{files_json}</script>"
    )
    .unwrap();
    out.push_str("<script src=\"script.js\"></script>\n</body>\n</html>\n");
    Ok(out)
}

/// Serialize `value` for a `<script>` element. `<` only occurs inside JSON
/// strings, where the `\u003c` escape decodes to the same text and cannot
/// close the element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// One table row for `node`, then its children in order.
fn render_node(out: &mut String, node: &TreeNode<'_>, depth: usize) {
    let kind = if node.is_directory { "dir" } else { "file" };
    let name = escape(&node.name);
    let label = if node.is_directory {
        format!("{name}/")
    } else {
        format!(
            "<a href=\"{PAGES_DIR}/{}\">{name}</a>",
            escape(&page_path(&node.path))
        )
    };
    let c = &node.counters;

    writeln!(
        out,
        "<tr class=\"{kind} {level}\" data-path=\"{path}\">\
         <td class=\"name\" style=\"padding-left: {indent}em\">{label}</td>\
         <td class=\"pct\"><span class=\"bar\"><span class=\"fill\" style=\"width: {pct:.2}%\">\
         </span></span>{pct:.2}%</td>\
         <td>{cs}/{ts}</td><td>{tl}</td><td>{cl}</td><td>{pl}</td><td>{ml}</td></tr>",
        level = level_class(node.coverage_percent),
        path = escape(&node.path),
        indent = 0.5 + depth as f64 * 1.25,
        pct = node.coverage_percent,
        cs = c.covered_statements,
        ts = c.total_statements,
        tl = c.tracked_lines,
        cl = c.covered_lines,
        pl = c.partial_lines,
        ml = c.missed_lines,
    )
    .unwrap();

    for child in &node.children {
        render_node(out, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{percent, Counters, LineStatus};
    use crate::tree;

    fn metrics(local_path: &str, total: u64, covered: u64) -> FileMetrics {
        FileMetrics {
            file_name: format!("example.com/shop/{local_path}"),
            local_path: local_path.to_string(),
            counters: Counters {
                tracked_lines: total,
                covered_lines: covered,
                missed_lines: total - covered,
                total_statements: total,
                covered_statements: covered,
                ..Default::default()
            },
            coverage_percent: percent(covered, total),
            per_line_status: vec![LineStatus::NotTracked],
        }
    }

    fn render_files(files: &[FileMetrics]) -> String {
        let corpus = CorpusMetrics::from_files(files);
        let root = tree::build(files);
        render(&corpus, files, &root, "example.com/shop", "2026-01-01 00:00:00 UTC").unwrap()
    }

    fn page() -> String {
        render_files(&[metrics("main.go", 4, 1), metrics("cart/cart.go", 4, 4)])
    }

    /// Contents of the `<script type="application/json">` element with `id`.
    fn embedded(html: &str, id: &str) -> serde_json::Value {
        let open = format!("<script type=\"application/json\" id=\"{id}\">");
        let start = html.find(&open).unwrap() + open.len();
        let end = start + html[start..].find("</script>").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_render_summary() {
        let html = page();
        assert!(html.contains("<h1>example.com/shop</h1>"));
        assert!(html.contains("62.50% of statements (5 of 8) in 2 files"));
        assert!(html.contains("Generated 2026-01-01 00:00:00 UTC"));
    }

    #[test]
    fn test_render_rows_in_tree_order() {
        let html = page();
        let dir = html.find("data-path=\"cart\"").unwrap();
        let nested = html.find("data-path=\"cart/cart.go\"").unwrap();
        let top = html.find("data-path=\"main.go\"").unwrap();
        assert!(dir < nested && nested < top);
        assert!(html.contains("<a href=\"tree/cart/cart.html\">cart.go</a>"));
        assert!(html.contains("<tr class=\"dir high\""));
        assert!(html.contains("<tr class=\"file low\" data-path=\"main.go\""));
    }

    #[test]
    fn test_render_embeds_tree_and_files() {
        let html = page();
        assert!(html.contains("<svg id=\"donut\""));
        assert!(html.contains("<nav id=\"breadcrumb\" data-root=\"example.com/shop\">"));

        let tree = embedded(&html, "tree-data");
        assert_eq!(tree["name"], "/");
        assert_eq!(tree["coveragePercent"], 62.5);
        assert_eq!(tree["children"][0]["name"], "cart");
        let cart = &tree["children"][0]["children"][0];
        assert_eq!(cart["fileMetrics"]["localPath"], "cart/cart.go");

        let files = embedded(&html, "files-data");
        assert_eq!(files.as_array().unwrap().len(), 2);
        assert_eq!(files[0]["localPath"], "main.go");
    }

    #[test]
    fn test_embedded_json_cannot_close_script() {
        let html = render_files(&[metrics("x</script><b>.go", 1, 1)]);

        assert_eq!(html.matches("</script>").count(), 3);
        let files = embedded(&html, "files-data");
        assert_eq!(files[0]["localPath"], "x</script><b>.go");
    }
}
