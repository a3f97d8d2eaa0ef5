use chrono::Utc;

use crate::ranking::{RankedReport, TOP_N};

/// HTML email body: heading, job reference and a table of the top matches.
pub fn render_digest(report: &RankedReport) -> String {
    let mut html = String::from("<h3>Candidate Ranking Report</h3>\n");
    html.push_str(&format!(
        "<p>Attached is the detailed breakdown of all candidates for <strong>{}</strong>.</p>\n",
        escape_html(report.job_title())
    ));
    html.push_str(&format!(
        "<p style=\"color:#666\">{} candidates evaluated &middot; generated {}</p>\n",
        report.len(),
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    if report.is_empty() {
        html.push_str("<p>No candidates were evaluated in this run.</p>\n");
        return html;
    }

    html.push_str("<h4>Top Matches:</h4>\n");
    html.push_str("<table border=\"1\" cellpadding=\"4\" style=\"border-collapse:collapse\">\n");
    html.push_str("<tr><th>Score</th><th>Name</th><th>Summary</th><th>Red Flags</th></tr>\n");
    for result in report.top(TOP_N) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            result.score,
            escape_html(&result.name),
            escape_html(&result.summary),
            escape_html(&result.red_flags),
        ));
    }
    html.push_str("</table>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
