use crate::report::summary_model::DatasetSummary;

const TOP_LABELS: usize = 10;

/// Format a dataset summary for terminal output.
///
/// Produces output like:
/// ```text
/// === Dataset: rico_dataset ===
///
///   samples            3
///   with detections    2
///   with ui_vector     1
///   ...
///
/// Top labels:
///   Text                        12
///   Icon                         4
/// ```
pub fn format_console_report(summary: &DatasetSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Dataset: {} ===\n\n", summary.name));

    let rows = [
        ("samples", summary.total),
        ("with detections", summary.with_detections),
        ("with ui_vector", summary.with_embedding),
        ("with mask", summary.with_mask),
        ("with metadata", summary.with_metadata),
        ("detections", summary.total_detections),
    ];
    for (name, value) in rows {
        out.push_str(&format!("  {:<18} {}\n", name, value));
    }

    let top = summary.top_labels(TOP_LABELS);
    if !top.is_empty() {
        out.push_str("\nTop labels:\n");
        for (label, count) in top {
            out.push_str(&format!("  {:<24} {:>6}\n", label, count));
        }
    }

    if !summary.brain_keys.is_empty() {
        out.push_str(&format!("\nBrain runs: {}\n", summary.brain_keys.join(", ")));
    }

    out
}
