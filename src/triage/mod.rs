pub mod classifier;
pub mod decision;
pub mod error;
pub mod policies;
pub mod schemas;
pub mod validation;

pub use classifier::{detect_doc_type, infer_priority};
pub use decision::{
    build_decision, build_fail_closed_decision, elapsed_ms_since, DecisionDraft, AGENT_MODEL_NAME,
    WORKFLOW_MODEL_NAME,
};
pub use error::TriageError;
pub use policies::{find_required_missing_fields, recommend_queue, should_escalate};
pub use schemas::{
    Channel, CustomerTier, DecisionTrace, DocType, MetaValue, Metadata, Priority, Region,
    TriageDecision, TriageDecisionParts, TriageInput, TriageMode,
};
pub use validation::{assert_valid_triage_decision, validate_triage_decision};
