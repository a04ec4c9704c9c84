//! Self-contained HTML rendering (dark theme, no external assets)

use super::document::{Outcome, ReportDocument, ReportEntry};

const STYLE: &str = "\
body{background:#1e1e2e;color:#cdd6f4;font-family:system-ui,sans-serif;margin:0;padding:2rem}
h1{margin-top:0}
table.info{border-collapse:collapse;margin-bottom:1.5rem}
table.info td{padding:.2rem 1rem .2rem 0}
.summary span{margin-right:1.5rem}
.case{border:1px solid #45475a;border-radius:6px;margin:1rem 0;padding:1rem}
.case h2{font-size:1.1rem;margin:0 0 .3rem}
.case .description{color:#a6adc8;margin:0 0 .8rem;white-space:pre-wrap}
.badge{border-radius:4px;font-size:.75rem;font-weight:bold;padding:.1rem .4rem;text-transform:uppercase}
.badge.pass{background:#a6e3a1;color:#1e1e2e}
.badge.fail{background:#f38ba8;color:#1e1e2e}
.badge.info{background:#89b4fa;color:#1e1e2e}
.case.pass{border-left:4px solid #a6e3a1}
.case.fail{border-left:4px solid #f38ba8}
ol.log{margin:0;padding-left:1.5rem}
ol.log li{margin:.2rem 0}
";

/// Render a full HTML document.
#[must_use]
pub fn render_html(doc: &ReportDocument) -> String {
    let title = escape(&doc.title);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>Suite: {title}</title>\n"));
    out.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));
    out.push_str(&format!("<h1>{title}</h1>\n"));

    out.push_str("<table class=\"info\">\n");
    out.push_str(&format!(
        "<tr><td>generated</td><td>{}</td></tr>\n",
        escape(&doc.generated_at)
    ));
    for info in &doc.system_info {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(&info.key),
            escape(&info.value)
        ));
    }
    out.push_str("</table>\n");

    out.push_str(&format!(
        "<p class=\"summary\"><span>total: {}</span><span>passed: {}</span><span>failed: {}</span><span>info: {}</span></p>\n",
        doc.summary.total, doc.summary.passed, doc.summary.failed, doc.summary.info
    ));

    if doc.entries.is_empty() {
        out.push_str("<p class=\"empty\">No test cases were recorded.</p>\n");
    }
    for entry in &doc.entries {
        render_entry(&mut out, entry);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_entry(out: &mut String, entry: &ReportEntry) {
    let status = entry.status();
    out.push_str(&format!("<section class=\"case {status}\">\n"));
    out.push_str(&format!(
        "<h2>{} TestCase: {}</h2>\n",
        badge(status),
        escape(&entry.name)
    ));
    out.push_str(&format!(
        "<p class=\"description\">Description: {}</p>\n",
        escape(&entry.description)
    ));
    if !entry.lines.is_empty() {
        out.push_str("<ol class=\"log\">\n");
        for line in &entry.lines {
            out.push_str(&format!(
                "<li>{} {}</li>\n",
                badge(line.outcome),
                escape(&line.message)
            ));
        }
        out.push_str("</ol>\n");
    }
    out.push_str("</section>\n");
}

fn badge(outcome: Outcome) -> String {
    format!("<span class=\"badge {outcome}\">{outcome}</span>")
}

fn escape(s: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{LogLine, SystemInfo};

    fn doc_with(entries: Vec<ReportEntry>) -> ReportDocument {
        ReportDocument::new(
            "TestPetStoreSwaggerApi",
            "2020-11-13T08:15:30Z",
            vec![SystemInfo {
                key: "tester".into(),
                value: "sizwe".into(),
            }],
            entries,
        )
    }

    #[test]
    fn escapes_markup_in_messages() {
        let mut entry = ReportEntry::new("<script>", "a & b");
        entry.lines.push(LogLine {
            outcome: Outcome::Fail,
            message: "expected 'status' to be \"success\"".into(),
        });
        let html = render_html(&doc_with(vec![entry]));
        assert!(html.contains("TestCase: &lt;script&gt;"));
        assert!(html.contains("Description: a &amp; b"));
        assert!(html.contains("expected &#39;status&#39; to be &quot;success&quot;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn entry_markup() {
        let mut entry = ReportEntry::new("add_a_new_pet", "Add a new pet");
        entry.lines.push(LogLine {
            outcome: Outcome::Pass,
            message: "pet id 42 is a positive integer".into(),
        });
        let mut out = String::new();
        render_entry(&mut out, &entry);
        insta::assert_snapshot!(out, @r#"
        <section class="case pass">
        <h2><span class="badge pass">pass</span> TestCase: add_a_new_pet</h2>
        <p class="description">Description: Add a new pet</p>
        <ol class="log">
        <li><span class="badge pass">pass</span> pet id 42 is a positive integer</li>
        </ol>
        </section>
        "#);
    }

    #[test]
    fn outcome_colours_fill_badges_only() {
        for rule in STYLE.lines().filter(|r| r.contains("background:#")) {
            let selector = rule.split('{').next().unwrap_or_default();
            assert!(
                selector == "body" || selector.starts_with(".badge."),
                "{rule}"
            );
        }
        assert!(STYLE.contains(".case.fail{border-left"));
    }

    #[test]
    fn summary_and_system_info_rendered() {
        let html = render_html(&doc_with(vec![ReportEntry::new("a", "b")]));
        assert!(html.contains("<title>Suite: TestPetStoreSwaggerApi</title>"));
        assert!(html.contains("<tr><td>tester</td><td>sizwe</td></tr>"));
        assert!(html.contains("<span>total: 1</span>"));
        assert!(html.contains("<span>info: 1</span>"));
        assert!(!html.contains("No test cases were recorded"));
    }
}
