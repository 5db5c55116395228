use crate::triage::{DocType, Priority, TriageDecision};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One held-out gold label, keyed by document id.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GoldLabel {
    pub doc_id: String,
    pub true_doc_type: DocType,
    pub priority: Priority,
    pub severity_score: u8,
    pub recommended_queue: String,
    #[serde(default)]
    pub required_missing_fields: Vec<String>,
    pub escalate: bool,
    #[serde(default)]
    pub escalation_reason: Option<String>,
}

pub type GoldIndex = BTreeMap<String, GoldLabel>;

pub fn gold_index(rows: Vec<GoldLabel>) -> GoldIndex {
    rows.into_iter().map(|row| (row.doc_id.clone(), row)).collect()
}

/// A gold row is an edge case when it escalates or has any missing required
/// field; these slices surface where the runners diverge most.
pub fn edge_case_flag(gold: &GoldLabel) -> bool {
    gold.escalate || !gold.required_missing_fields.is_empty()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceScore {
    pub count: usize,
    pub doc_type_accuracy: f64,
    pub queue_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeScore {
    pub doc_type_accuracy: f64,
    pub queue_accuracy: f64,
    pub escalation_precision: f64,
    pub escalation_recall: f64,
    pub missing_field_recall: f64,
    pub avg_elapsed_ms: f64,
    pub avg_tool_calls: f64,
    pub slices: BTreeMap<String, SliceScore>,
}

fn accuracy<F>(predictions: &[&TriageDecision], gold: &GoldIndex, matches: F) -> f64
where
    F: Fn(&TriageDecision, &GoldLabel) -> bool,
{
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .filter(|decision| {
            gold.get(&decision.doc_id)
                .is_some_and(|label| matches(decision, label))
        })
        .count();
    correct as f64 / predictions.len() as f64
}

pub fn doc_type_accuracy(predictions: &[&TriageDecision], gold: &GoldIndex) -> f64 {
    accuracy(predictions, gold, |decision, label| {
        decision.doc_type == label.true_doc_type
    })
}

pub fn queue_accuracy(predictions: &[&TriageDecision], gold: &GoldIndex) -> f64 {
    accuracy(predictions, gold, |decision, label| {
        decision.recommended_queue == label.recommended_queue
    })
}

pub fn escalation_precision_recall(
    predictions: &[&TriageDecision],
    gold: &GoldIndex,
) -> (f64, f64) {
    let mut true_positive = 0u32;
    let mut false_positive = 0u32;
    let mut false_negative = 0u32;

    for decision in predictions {
        let Some(label) = gold.get(&decision.doc_id) else {
            continue;
        };
        match (decision.escalate, label.escalate) {
            (true, true) => true_positive += 1,
            (true, false) => false_positive += 1,
            (false, true) => false_negative += 1,
            (false, false) => {}
        }
    }

    let precision = if true_positive + false_positive > 0 {
        f64::from(true_positive) / f64::from(true_positive + false_positive)
    } else {
        0.0
    };
    let recall = if true_positive + false_negative > 0 {
        f64::from(true_positive) / f64::from(true_positive + false_negative)
    } else {
        0.0
    };
    (precision, recall)
}

/// Per-case recall of gold missing fields, averaged; cases with nothing
/// missing in gold count as full recall.
pub fn missing_field_recall(predictions: &[&TriageDecision], gold: &GoldIndex) -> f64 {
    let mut recalls = Vec::new();

    for decision in predictions {
        let Some(label) = gold.get(&decision.doc_id) else {
            continue;
        };
        let gold_missing: BTreeSet<&str> = label
            .required_missing_fields
            .iter()
            .map(String::as_str)
            .collect();
        if gold_missing.is_empty() {
            recalls.push(1.0);
            continue;
        }
        let predicted: BTreeSet<&str> = decision
            .required_missing_fields
            .iter()
            .map(String::as_str)
            .collect();
        let hit = gold_missing.intersection(&predicted).count();
        recalls.push(hit as f64 / gold_missing.len() as f64);
    }

    mean(&recalls)
}

pub fn latency_and_cost_proxies(predictions: &[&TriageDecision]) -> (f64, f64) {
    let elapsed: Vec<f64> = predictions
        .iter()
        .map(|d| d.decision_trace.elapsed_ms as f64)
        .collect();
    let tool_calls: Vec<f64> = predictions
        .iter()
        .map(|d| f64::from(d.decision_trace.tool_calls))
        .collect();
    (mean(&elapsed), mean(&tool_calls))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn slice_score(rows: &[&TriageDecision], gold: &GoldIndex) -> SliceScore {
    SliceScore {
        count: rows.len(),
        doc_type_accuracy: doc_type_accuracy(rows, gold),
        queue_accuracy: queue_accuracy(rows, gold),
    }
}

/// Slice breakdowns by true document type and by edge-case status.
pub fn slice_summary(
    predictions: &[&TriageDecision],
    gold: &GoldIndex,
) -> BTreeMap<String, SliceScore> {
    let mut by_doc_type: BTreeMap<DocType, Vec<&TriageDecision>> = BTreeMap::new();
    let mut by_edge_case: BTreeMap<&'static str, Vec<&TriageDecision>> = BTreeMap::new();

    for decision in predictions {
        let Some(label) = gold.get(&decision.doc_id) else {
            continue;
        };
        by_doc_type.entry(label.true_doc_type).or_default().push(decision);
        let edge_label = if edge_case_flag(label) {
            "edge_case"
        } else {
            "non_edge_case"
        };
        by_edge_case.entry(edge_label).or_default().push(decision);
    }

    let mut summary = BTreeMap::new();
    for (doc_type, rows) in &by_doc_type {
        summary.insert(format!("doc_type:{doc_type}"), slice_score(rows, gold));
    }
    for (label, rows) in &by_edge_case {
        summary.insert(format!("slice:{label}"), slice_score(rows, gold));
    }
    summary
}

/// Full per-mode score over a prediction set.
pub fn score(predictions: &[TriageDecision], gold: &GoldIndex) -> ModeScore {
    let refs: Vec<&TriageDecision> = predictions.iter().collect();
    let (escalation_precision, escalation_recall) = escalation_precision_recall(&refs, gold);
    let (avg_elapsed_ms, avg_tool_calls) = latency_and_cost_proxies(&refs);

    ModeScore {
        doc_type_accuracy: doc_type_accuracy(&refs, gold),
        queue_accuracy: queue_accuracy(&refs, gold),
        escalation_precision,
        escalation_recall,
        missing_field_recall: missing_field_recall(&refs, gold),
        avg_elapsed_ms,
        avg_tool_calls,
        slices: slice_summary(&refs, gold),
    }
}
