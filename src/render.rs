use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::ReportError;
use crate::report::{AggregatedReport, MutatorDetail};

/// Replaced with the report serialized as JSON.
pub const JSON_PLACEHOLDER: &str = "{{REPORT_JSON}}";

/// Replaced with the generated report markup.
pub const BODY_PLACEHOLDER: &str = "{{REPORT_BODY}}";

/// Template used when none is supplied.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Mutation testing report</title>
</head>
<body>
<h1>Mutation testing report</h1>
{{REPORT_BODY}}
<script type="application/json" id="report-data">{{REPORT_JSON}}</script>
</body>
</html>
"#;

/// True when `template` contains at least one placeholder.
pub fn has_placeholders(template: &str) -> bool {
    template.contains(JSON_PLACEHOLDER) || template.contains(BODY_PLACEHOLDER)
}

/// Serialize the report with the field names templates expect.
pub fn to_json(report: &AggregatedReport) -> Result<String, ReportError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| ReportError::MalformedInput(format!("failed to serialize report: {e}")))
}

/// Fill `template` with the report. Falls back to [`DEFAULT_TEMPLATE`].
pub fn render_html(report: &AggregatedReport, template: Option<&str>) -> Result<String, ReportError> {
    let template = template.unwrap_or(DEFAULT_TEMPLATE);

    if !has_placeholders(template) {
        return Err(ReportError::Template(format!(
            "template contains neither {JSON_PLACEHOLDER} nor {BODY_PLACEHOLDER}"
        )));
    }

    // `</` inside a script block would end it early.
    let json = to_json(report)?.replace("</", "<\\/");
    let body = render_body(report);

    Ok(template
        .replace(JSON_PLACEHOLDER, &json)
        .replace(BODY_PLACEHOLDER, &body))
}

/// Write rendered output to `path`.
pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|e| ReportError::io(path, e))
}

fn render_body(report: &AggregatedReport) -> String {
    let s = &report.stats;
    let mut out = String::with_capacity(4096);

    out.push_str("<table class=\"stats\">\n");
    for (label, value) in [
        ("Total mutants", s.total_mutants_count.to_string()),
        ("Killed", s.killed_count.to_string()),
        ("Escaped", s.escaped_count.to_string()),
        ("Not covered", s.not_covered_count.to_string()),
        ("Errors", s.error_count.to_string()),
        ("Skipped", s.skipped_count.to_string()),
        ("Timed out", s.time_out_count.to_string()),
        ("MSI", format!("{:.2}", s.msi)),
        ("Code coverage", format!("{:.2}", s.mutation_code_coverage)),
        ("Covered code MSI", format!("{:.2}", s.covered_code_msi)),
    ] {
        let _ = writeln!(out, "<tr><th>{label}</th><td>{value}</td></tr>");
    }
    out.push_str("</table>\n");

    for (path, details) in &report.files {
        let _ = writeln!(
            out,
            "<section class=\"file\">\n<h2>{}</h2>",
            escape_html(path)
        );
        write_mutants(&mut out, "escaped", "Escaped", &details.escaped);
        write_mutants(&mut out, "killed", "Killed", &details.killed);
        out.push_str("</section>\n");
    }

    out
}

fn write_mutants(out: &mut String, class: &str, heading: &str, mutants: &[MutatorDetail]) {
    if mutants.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "<h3>{heading} ({})</h3>\n<ul class=\"{class}\">",
        mutants.len()
    );
    for m in mutants {
        let _ = writeln!(
            out,
            "<li><span class=\"mutator\">{}</span> <code class=\"checksum\">{}</code>\n<pre class=\"diff\">{}</pre></li>",
            escape_html(&m.mutator_name),
            escape_html(&m.checksum),
            escape_html(&m.diff),
        );
    }
    out.push_str("</ul>\n");
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
