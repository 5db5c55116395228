use crate::triage::schemas::{CustomerTier, DocType, Metadata, Priority};

pub const ESCALATE_PRIVILEGED_ACCESS: &str =
    "privileged access request for regulated/high-tier account";
pub const ESCALATE_INCIDENT_WITHOUT_EVIDENCE: &str =
    "potential production incident with incomplete diagnostic evidence";
pub const ESCALATE_MULTIPLE_MISSING_FIELDS: &str =
    "multiple required fields missing for safe automated triage";

/// Incident diagnostics field that drives both a P1 upgrade and escalation
/// rule 2.
pub const INCIDENT_EVIDENCE_FIELD: &str = "request_id_examples";

/// Required metadata fields per document type, in declared order.
pub fn required_fields(doc_type: DocType) -> &'static [&'static str] {
    match doc_type {
        DocType::IncidentReport => &["service", "region", INCIDENT_EVIDENCE_FIELD],
        DocType::AccessRequest => &["requested_role", "justification", "approval_reference"],
        DocType::SecurityQuestionnaire => &["framework", "required_due_date"],
        DocType::BillingDispute => &["issue_type", "invoice_id"],
        DocType::FeatureRequest => &["product_area", "business_justification"],
    }
}

/// Subset of the required-field tuple absent from the metadata keys, table
/// order preserved.
pub fn find_required_missing_fields(doc_type: DocType, metadata: &Metadata) -> Vec<String> {
    required_fields(doc_type)
        .iter()
        .filter(|field| !metadata.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

pub fn recommend_queue(doc_type: DocType) -> &'static str {
    match doc_type {
        DocType::IncidentReport => "support_incident",
        DocType::AccessRequest => "security_access",
        DocType::SecurityQuestionnaire => "compliance_ops",
        DocType::BillingDispute => "billing_ops",
        DocType::FeatureRequest => "product_feedback",
    }
}

/// Ordered escalation rules, first match wins. `Some(reason)` means the
/// decision must escalate with exactly that reason.
pub fn should_escalate(
    doc_type: DocType,
    customer_tier: Option<CustomerTier>,
    missing_fields: &[String],
    priority: Priority,
) -> Option<&'static str> {
    if doc_type == DocType::AccessRequest && customer_tier == Some(CustomerTier::Enterprise) {
        return Some(ESCALATE_PRIVILEGED_ACCESS);
    }

    if doc_type == DocType::IncidentReport
        && missing_fields.iter().any(|f| f == INCIDENT_EVIDENCE_FIELD)
        && priority == Priority::P1
    {
        return Some(ESCALATE_INCIDENT_WITHOUT_EVIDENCE);
    }

    if missing_fields.len() >= 2 {
        return Some(ESCALATE_MULTIPLE_MISSING_FIELDS);
    }

    None
}
