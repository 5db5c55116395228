use crate::eval::harness::EvalSummary;
use crate::eval::metrics::SliceScore;
use crate::triage::{TriageDecision, TriageMode};
use std::collections::BTreeSet;

/// Overall + per-slice Markdown tables for the A/B summary.
pub fn render_markdown_summary(summary: &EvalSummary) -> String {
    let mut lines = vec!["# A/B Eval Summary".to_string(), String::new()];
    lines.push("## Overall".to_string());
    lines.push(String::new());
    lines.push(
        "| Mode | DocType Acc | Queue Acc | Escalation P | Escalation R | Missing Recall | Avg Elapsed ms | Avg Tool Calls |"
            .to_string(),
    );
    lines.push(
        "|------|-------------|-----------|--------------|--------------|----------------|----------------|----------------|"
            .to_string(),
    );

    for mode in [TriageMode::Workflow, TriageMode::Agent] {
        let Some(metrics) = summary.modes.get(&mode) else {
            continue;
        };
        lines.push(format!(
            "| {mode} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.1} | {:.2} |",
            metrics.doc_type_accuracy,
            metrics.queue_accuracy,
            metrics.escalation_precision,
            metrics.escalation_recall,
            metrics.missing_field_recall,
            metrics.avg_elapsed_ms,
            metrics.avg_tool_calls,
        ));
    }

    lines.push(String::new());
    lines.push("## Slices".to_string());
    lines.push(String::new());

    let slice_labels: BTreeSet<&String> = summary
        .modes
        .values()
        .flat_map(|metrics| metrics.slices.keys())
        .collect();
    for label in slice_labels {
        lines.push(format!("### {label}"));
        lines.push(String::new());
        lines.push("| Mode | Count | DocType Acc | Queue Acc |".to_string());
        lines.push("|------|-------|-------------|-----------|".to_string());
        for mode in [TriageMode::Workflow, TriageMode::Agent] {
            let empty = SliceScore {
                count: 0,
                doc_type_accuracy: 0.0,
                queue_accuracy: 0.0,
            };
            let slice = summary
                .modes
                .get(&mode)
                .and_then(|metrics| metrics.slices.get(label))
                .unwrap_or(&empty);
            lines.push(format!(
                "| {mode} | {} | {:.3} | {:.3} |",
                slice.count, slice.doc_type_accuracy, slice.queue_accuracy,
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

const CSV_HEADER: &str = "mode,doc_id,doc_type,priority,recommended_queue,escalate,\
escalation_reason,confidence,required_missing_fields,tool_calls,elapsed_ms";

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Per-case CSV across both modes, one decision per row.
pub fn render_predictions_csv(predictions: &[TriageDecision]) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];
    for decision in predictions {
        let trace = &decision.decision_trace;
        let row = [
            trace.mode.as_str().to_string(),
            csv_field(&decision.doc_id),
            decision.doc_type.to_string(),
            decision.priority.to_string(),
            csv_field(&decision.recommended_queue),
            decision.escalate.to_string(),
            csv_field(decision.escalation_reason.as_deref().unwrap_or("")),
            format!("{}", decision.confidence),
            csv_field(&decision.required_missing_fields.join(",")),
            trace.tool_calls.to_string(),
            trace.elapsed_ms.to_string(),
        ];
        lines.push(row.join(","));
    }
    lines.push(String::new());
    lines.join("\n")
}
