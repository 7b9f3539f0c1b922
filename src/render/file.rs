//! Annotated source page for a single file.

use std::borrow::Cow;
use std::fmt::Write;

use super::{escape, level_class, relative_prefix};
use crate::model::FileMetrics;

/// Render the page for `metrics`, one table row per entry in `lines`.
pub fn render(metrics: &FileMetrics, lines: &[&str]) -> String {
    let prefix = relative_prefix(&metrics.local_path);
    let title = escape(&metrics.local_path);
    let c = &metrics.counters;

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    writeln!(out, "<title>{title} - coverage</title>").unwrap();
    writeln!(out, "<link rel=\"stylesheet\" href=\"{prefix}style.css\">").unwrap();
    out.push_str("</head>\n<body>\n<header>\n");
    writeln!(out, "<a href=\"{prefix}../index.html\">&larr; All files</a>").unwrap();
    writeln!(out, "<h1>{title}</h1>").unwrap();
    writeln!(
        out,
        "<div class=\"summary {level}\">{pct:.2}% of statements ({covered} of {total}) &middot; \
         {tracked} lines tracked: {cl} covered, {pl} partial, {ml} missed</div>",
        level = level_class(metrics.coverage_percent),
        pct = metrics.coverage_percent,
        covered = c.covered_statements,
        total = c.total_statements,
        tracked = c.tracked_lines,
        cl = c.covered_lines,
        pl = c.partial_lines,
        ml = c.missed_lines,
    )
    .unwrap();
    out.push_str("</header>\n<table class=\"source\">\n<tbody>\n");

    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        let status = metrics.status(n);
        let code = if line.is_empty() {
            Cow::Borrowed("&nbsp;")
        } else {
            escape(line)
        };
        writeln!(
            out,
            "<tr id=\"L{n}\" class=\"{status}\"><td class=\"num\"><a href=\"#L{n}\">{n}</a></td>\
             <td class=\"marker\">{marker}</td><td class=\"code\"><pre>{code}</pre></td></tr>",
            marker = status.marker(),
        )
        .unwrap();
    }

    out.push_str("</tbody>\n</table>\n");
    writeln!(out, "<script src=\"{prefix}script.js\"></script>").unwrap();
    out.push_str("</body>\n</html>\n");
    out
}
