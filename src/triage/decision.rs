use crate::triage::classifier::{detect_doc_type, infer_priority};
use crate::triage::error::TriageError;
use crate::triage::policies::{find_required_missing_fields, recommend_queue, should_escalate};
use crate::triage::schemas::{
    DecisionTrace, DocType, TriageDecision, TriageDecisionParts, TriageInput, TriageMode,
};
use std::time::Instant;

pub const WORKFLOW_MODEL_NAME: &str = "heuristic-v1";
pub const AGENT_MODEL_NAME: &str = "heuristic-agent-v1";

const FAIL_CLOSED_RATIONALE: &str =
    "Fail-closed escalation due to runner validation/guardrail failure.";

/// Runner-supplied fields for a candidate decision; the policy-governed
/// fields are derived here.
#[derive(Debug, Clone)]
pub struct DecisionDraft<'a> {
    pub mode: TriageMode,
    pub doc_type: DocType,
    pub steps: Vec<String>,
    pub tool_calls: u32,
    pub retry_count: u32,
    pub elapsed_ms: u64,
    pub model_name: &'a str,
    pub confidence: f64,
    pub rationale: &'a str,
    pub queue_override: Option<&'a str>,
}

/// Assemble a complete decision: missing fields, priority/severity, queue,
/// and escalation all come from the policy tables, then the validating
/// constructor enforces the decision invariants.
pub fn build_decision(
    input: &TriageInput,
    draft: DecisionDraft<'_>,
) -> Result<TriageDecision, TriageError> {
    let missing_fields = find_required_missing_fields(draft.doc_type, &input.metadata);
    let (priority, _severity) = infer_priority(draft.doc_type, input.customer_tier, &missing_fields);
    let queue = draft
        .queue_override
        .unwrap_or_else(|| recommend_queue(draft.doc_type));
    let escalation_reason = should_escalate(
        draft.doc_type,
        input.customer_tier,
        &missing_fields,
        priority,
    );

    TriageDecision::new(TriageDecisionParts {
        doc_id: input.doc_id.clone(),
        doc_type: draft.doc_type,
        priority,
        recommended_queue: queue.to_string(),
        required_missing_fields: missing_fields,
        escalate: escalation_reason.is_some(),
        escalation_reason: escalation_reason.map(str::to_string),
        confidence: draft.confidence,
        rationale: draft.rationale.to_string(),
        decision_trace: DecisionTrace {
            mode: draft.mode,
            steps: draft.steps,
            tool_calls: draft.tool_calls,
            retry_count: draft.retry_count,
            elapsed_ms: draft.elapsed_ms,
            model_name: Some(draft.model_name.to_string()),
        },
    })
}

/// Universal safety fallback: every failure path in either runner converges
/// here. Re-detects the document type from the input alone, derives the
/// policy fields normally, and forces escalation with the supplied reason.
pub fn build_fail_closed_decision(
    input: &TriageInput,
    mode: TriageMode,
    steps: Vec<String>,
    tool_calls: u32,
    retry_count: u32,
    elapsed_ms: u64,
    failure_reason: String,
) -> TriageDecision {
    let doc_type = detect_doc_type(&input.content, input.doc_type_hint.as_deref());
    let missing_fields = find_required_missing_fields(doc_type, &input.metadata);
    let (priority, severity) = infer_priority(doc_type, input.customer_tier, &missing_fields);

    // Escalate=true with a non-empty reason always satisfies the decision
    // invariant, so the struct is assembled directly.
    TriageDecision {
        doc_id: input.doc_id.clone(),
        doc_type,
        priority,
        severity_score: severity,
        recommended_queue: recommend_queue(doc_type).to_string(),
        required_missing_fields: missing_fields,
        escalate: true,
        escalation_reason: Some(failure_reason),
        confidence: 0.0,
        rationale: FAIL_CLOSED_RATIONALE.to_string(),
        decision_trace: DecisionTrace {
            mode,
            steps,
            tool_calls,
            retry_count,
            elapsed_ms,
            model_name: Some(WORKFLOW_MODEL_NAME.to_string()),
        },
    }
}

/// Monotonic elapsed time since `start`, floored at 1ms so traces never
/// report a zero-length run.
pub fn elapsed_ms_since(start: Instant) -> u64 {
    (start.elapsed().as_millis() as u64).max(1)
}
