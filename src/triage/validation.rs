use crate::triage::error::TriageError;
use crate::triage::policies::{find_required_missing_fields, recommend_queue, should_escalate};
use crate::triage::schemas::{TriageDecision, TriageInput};
use std::collections::BTreeSet;

/// Re-derive every policy-governed field from the input and the decision's
/// own chosen doc type, and report any mismatch. Returns an empty list when
/// the decision is fully consistent; never fails.
pub fn validate_triage_decision(input: &TriageInput, decision: &TriageDecision) -> Vec<String> {
    let mut violations = Vec::new();

    if input.doc_id != decision.doc_id {
        violations.push("doc_id mismatch between input and decision".to_string());
    }

    let expected_queue = recommend_queue(decision.doc_type);
    if decision.recommended_queue != expected_queue {
        violations.push(format!(
            "recommended_queue mismatch: expected={expected_queue} got={}",
            decision.recommended_queue
        ));
    }

    let expected_missing: BTreeSet<String> =
        find_required_missing_fields(decision.doc_type, &input.metadata)
            .into_iter()
            .collect();
    let actual_missing: BTreeSet<String> =
        decision.required_missing_fields.iter().cloned().collect();
    if expected_missing != actual_missing {
        violations.push(format!(
            "required_missing_fields mismatch: expected={expected_missing:?} got={actual_missing:?}"
        ));
    }

    let expected_reason = should_escalate(
        decision.doc_type,
        input.customer_tier,
        &decision.required_missing_fields,
        decision.priority,
    );
    if let Some(reason) = expected_reason {
        if !decision.escalate {
            violations.push("decision must escalate per policy".to_string());
        }
        if decision.escalation_reason.as_deref() != Some(reason) {
            violations.push("escalation_reason mismatch with policy".to_string());
        }
    }

    violations
}

/// Strict variant: fails when any violation is present.
pub fn assert_valid_triage_decision(
    input: &TriageInput,
    decision: &TriageDecision,
) -> Result<(), TriageError> {
    let violations = validate_triage_decision(input, decision);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(TriageError::DecisionViolations(violations.join("; ")))
    }
}
