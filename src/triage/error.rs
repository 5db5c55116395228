#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("input field `{field}` must be non-empty")]
    EmptyInputField { field: String },
    #[error("escalation_reason is required when escalate=true")]
    EscalationReasonMissing,
    #[error("escalation_reason must be null when escalate=false")]
    EscalationReasonUnexpected,
    #[error("confidence {confidence} is outside [0.0, 1.0]")]
    ConfidenceOutOfRange { confidence: f64 },
    #[error("decision failed policy validation: {0}")]
    DecisionViolations(String),
}
