//! Output formatting for evaluation reports.
//!
//! Supports the tab-separated text report and JSON for scripting.

use reckon_core::{EvalReport, Evaluator};
use serde::Serialize;

/// JSON output structure: the report plus the configuration that produced it.
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub metrics: Vec<&'static str>,
    pub topk: &'a [usize],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_view: Option<&'a [u64]>,
    #[serde(flatten)]
    pub report: &'a EvalReport,
}

/// Formats a report as pretty-printed JSON.
pub fn format_json(evaluator: &Evaluator, report: &EvalReport) -> String {
    let config = evaluator.config();
    let output = JsonOutput {
        metrics: config.metrics().iter().map(|m| m.name()).collect(),
        topk: config.topk(),
        group_view: config.group_view().map(|view| view.thresholds()),
        report,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a report for the terminal.
pub fn format_human(report: &EvalReport) -> String {
    if report.buckets.is_empty() {
        return "No ground-truth rows to evaluate.".to_string();
    }
    report.to_string()
}
