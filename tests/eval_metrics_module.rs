use doctriage::eval::{edge_case_flag, gold_index, score, GoldLabel};
use doctriage::triage::{
    DecisionTrace, DocType, Priority, TriageDecision, TriageDecisionParts, TriageMode,
};

fn gold(doc_id: &str, doc_type: DocType, escalate: bool, missing: &[&str]) -> GoldLabel {
    GoldLabel {
        doc_id: doc_id.to_string(),
        true_doc_type: doc_type,
        priority: Priority::P2,
        severity_score: 3,
        recommended_queue: queue_for(doc_type).to_string(),
        required_missing_fields: missing.iter().map(|f| f.to_string()).collect(),
        escalate,
        escalation_reason: escalate.then(|| "reason".to_string()),
    }
}

fn queue_for(doc_type: DocType) -> &'static str {
    match doc_type {
        DocType::IncidentReport => "support_incident",
        DocType::AccessRequest => "security_access",
        DocType::SecurityQuestionnaire => "compliance_ops",
        DocType::BillingDispute => "billing_ops",
        DocType::FeatureRequest => "product_feedback",
    }
}

fn prediction(
    doc_id: &str,
    doc_type: DocType,
    escalate: bool,
    missing: &[&str],
    tool_calls: u32,
    elapsed_ms: u64,
) -> TriageDecision {
    TriageDecision::new(TriageDecisionParts {
        doc_id: doc_id.to_string(),
        doc_type,
        priority: Priority::P2,
        recommended_queue: queue_for(doc_type).to_string(),
        required_missing_fields: missing.iter().map(|f| f.to_string()).collect(),
        escalate,
        escalation_reason: escalate.then(|| "reason".to_string()),
        confidence: 0.8,
        rationale: "metrics module test".to_string(),
        decision_trace: DecisionTrace {
            mode: TriageMode::Workflow,
            steps: Vec::new(),
            tool_calls,
            retry_count: 0,
            elapsed_ms,
            model_name: None,
        },
    })
    .expect("prediction")
}

#[test]
fn edge_case_flag_covers_escalation_and_missing_fields() {
    assert!(edge_case_flag(&gold("a", DocType::BillingDispute, true, &[])));
    assert!(edge_case_flag(&gold(
        "b",
        DocType::BillingDispute,
        false,
        &["invoice_id"]
    )));
    assert!(!edge_case_flag(&gold("c", DocType::BillingDispute, false, &[])));
}

#[test]
fn score_reports_accuracy_over_the_prediction_set() {
    let gold = gold_index(vec![
        gold("d1", DocType::BillingDispute, false, &[]),
        gold("d2", DocType::IncidentReport, false, &[]),
    ]);
    let predictions = vec![
        prediction("d1", DocType::BillingDispute, false, &[], 0, 10),
        prediction("d2", DocType::FeatureRequest, false, &[], 0, 20),
    ];

    let metrics = score(&predictions, &gold);
    assert_eq!(metrics.doc_type_accuracy, 0.5);
    assert_eq!(metrics.queue_accuracy, 0.5);
    assert_eq!(metrics.avg_elapsed_ms, 15.0);
    assert_eq!(metrics.avg_tool_calls, 0.0);
}

#[test]
fn escalation_precision_and_recall_count_confusion_cells() {
    let gold = gold_index(vec![
        gold("tp", DocType::AccessRequest, true, &[]),
        gold("fp", DocType::BillingDispute, false, &[]),
        gold("fn", DocType::IncidentReport, true, &[]),
        gold("tn", DocType::FeatureRequest, false, &[]),
    ]);
    let predictions = vec![
        prediction("tp", DocType::AccessRequest, true, &[], 0, 1),
        prediction("fp", DocType::BillingDispute, true, &[], 0, 1),
        prediction("fn", DocType::IncidentReport, false, &[], 0, 1),
        prediction("tn", DocType::FeatureRequest, false, &[], 0, 1),
    ];

    let metrics = score(&predictions, &gold);
    assert_eq!(metrics.escalation_precision, 0.5);
    assert_eq!(metrics.escalation_recall, 0.5);
}

#[test]
fn missing_field_recall_averages_per_case_hits() {
    let gold = gold_index(vec![
        gold("full", DocType::IncidentReport, false, &["service", "region"]),
        gold("half", DocType::IncidentReport, false, &["service", "region"]),
        gold("free", DocType::BillingDispute, false, &[]),
    ]);
    let predictions = vec![
        prediction("full", DocType::IncidentReport, false, &["service", "region"], 0, 1),
        prediction("half", DocType::IncidentReport, false, &["service"], 0, 1),
        prediction("free", DocType::BillingDispute, false, &[], 0, 1),
    ];

    let metrics = score(&predictions, &gold);
    // (1.0 + 0.5 + 1.0) / 3
    assert!((metrics.missing_field_recall - 0.8333333333333334).abs() < 1e-9);
}

#[test]
fn slices_break_down_by_true_doc_type_and_edge_case_status() {
    let gold = gold_index(vec![
        gold("edge", DocType::AccessRequest, true, &[]),
        gold("plain", DocType::BillingDispute, false, &[]),
    ]);
    let predictions = vec![
        prediction("edge", DocType::AccessRequest, true, &[], 0, 1),
        prediction("plain", DocType::BillingDispute, false, &[], 0, 1),
    ];

    let metrics = score(&predictions, &gold);
    let edge_slice = metrics.slices.get("slice:edge_case").expect("edge slice");
    assert_eq!(edge_slice.count, 1);
    assert_eq!(edge_slice.doc_type_accuracy, 1.0);

    assert!(metrics.slices.contains_key("doc_type:access_request"));
    assert!(metrics.slices.contains_key("doc_type:billing_dispute"));
    assert!(metrics.slices.contains_key("slice:non_edge_case"));
}

#[test]
fn predictions_without_gold_rows_are_ignored_in_ratio_metrics() {
    let gold = gold_index(vec![gold("known", DocType::BillingDispute, false, &[])]);
    let predictions = vec![
        prediction("known", DocType::BillingDispute, false, &[], 0, 1),
        prediction("unknown", DocType::BillingDispute, true, &[], 0, 1),
    ];

    let metrics = score(&predictions, &gold);
    // Accuracy denominators still count every prediction.
    assert_eq!(metrics.doc_type_accuracy, 0.5);
    // The unmatched doc_id contributes nothing to the confusion cells.
    assert_eq!(metrics.escalation_precision, 0.0);
    assert_eq!(metrics.escalation_recall, 0.0);
}
