use serde_json::Value;

use super::types::{JudgeReport, Outcome};

/// The serialized `JudgeReport` with a derived `totals` object alongside its fields.
pub fn build_report(report: &JudgeReport) -> serde_json::Result<Value> {
    let mut doc = serde_json::to_value(report)?;
    if let Value::Object(fields) = &mut doc {
        fields.insert(
            "totals".to_string(),
            serde_json::json!({
                "judged": report.results.len(),
                "passed": report.passed(),
                "failed": report.failed(),
                "errored": report.errored(),
                "all_passed": report.all_passed(),
            }),
        );
    }
    Ok(doc)
}

fn push_block(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("  {title}:\n"));
    if body.is_empty() {
        out.push_str("    <empty>\n");
    }
    for line in body.lines() {
        out.push_str(&format!("    {line}\n"));
    }
}

pub fn format_text(report: &JudgeReport) -> String {
    let mut out = String::new();

    for r in &report.results {
        out.push_str(&format!("Test case {}: {}\n", r.index, r.outcome.label()));
        match r.outcome {
            Outcome::Pass => {}
            Outcome::Fail => {
                push_block(&mut out, "Expected", r.expected.as_str());
                push_block(
                    &mut out,
                    "Received",
                    r.actual.as_ref().map(|a| a.as_str()).unwrap_or_default(),
                );
                if let Some(diff) = &r.diagnostic {
                    push_block(&mut out, "Diff", diff);
                }
            }
            Outcome::Error => {
                if let Some(diag) = &r.diagnostic {
                    for line in diag.lines() {
                        out.push_str(&format!("  {line}\n"));
                    }
                }
            }
        }
    }

    if report.aborted {
        out.push_str(&format!(
            "Run aborted after {} of {} cases\n",
            report.results.len(),
            report.total_cases
        ));
    }
    out.push_str(&format!(
        "Summary: {} passed, {} failed, {} errored ({} cases)\n",
        report.passed(),
        report.failed(),
        report.errored(),
        report.total_cases
    ));
    out
}
