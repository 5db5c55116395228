use crate::triage::policies::INCIDENT_EVIDENCE_FIELD;
use crate::triage::schemas::{CustomerTier, DocType, Priority};

/// Keyword lists per document type. Iterated in `DocType::ALL` order: on
/// equal scores the first-declared type wins, and an all-zero tie lands on
/// `feature_request` as the declared fallback.
fn keywords(doc_type: DocType) -> &'static [&'static str] {
    match doc_type {
        DocType::IncidentReport => &["incident", "latency", "outage", "error rate", "request ids"],
        DocType::AccessRequest => &["access", "admin", "permission", "contractor", "privileged"],
        DocType::SecurityQuestionnaire => {
            &["security questionnaire", "soc2", "iso27001", "hipaa", "gdpr"]
        }
        DocType::BillingDispute => &["invoice", "billing", "charge", "overage", "tax"],
        DocType::FeatureRequest => {
            &["feature request", "enhancement", "improve", "would like", "roadmap"]
        }
    }
}

fn normalize_hint(hint: &str) -> String {
    hint.trim().to_lowercase().replace(' ', "_")
}

/// Infer the document type from free text and an optional hint. A hint that
/// names a known type short-circuits content analysis entirely.
pub fn detect_doc_type(content: &str, doc_type_hint: Option<&str>) -> DocType {
    if let Some(hint) = doc_type_hint {
        if let Ok(doc_type) = DocType::parse(&normalize_hint(hint)) {
            return doc_type;
        }
    }

    let content_lower = content.to_lowercase();
    let mut best = DocType::FeatureRequest;
    let mut best_score = -1i32;

    for doc_type in DocType::ALL {
        let score = keywords(doc_type)
            .iter()
            .filter(|keyword| content_lower.contains(**keyword))
            .count() as i32;
        if score > best_score {
            best = doc_type;
            best_score = score;
        }
    }

    best
}

/// Base priority per type, upgraded for enterprise accounts, then forced to
/// P1 for incident reports missing diagnostic evidence (the force overrides
/// the tier rule and is applied after it).
pub fn infer_priority(
    doc_type: DocType,
    customer_tier: Option<CustomerTier>,
    missing_fields: &[String],
) -> (Priority, u8) {
    let mut priority = match doc_type {
        DocType::IncidentReport => Priority::P1,
        DocType::AccessRequest => Priority::P2,
        DocType::SecurityQuestionnaire => Priority::P2,
        DocType::BillingDispute => Priority::P2,
        DocType::FeatureRequest => Priority::P3,
    };

    if customer_tier == Some(CustomerTier::Enterprise) && priority == Priority::P2 {
        priority = Priority::P1;
    }
    if doc_type == DocType::IncidentReport
        && missing_fields.iter().any(|f| f == INCIDENT_EVIDENCE_FIELD)
    {
        priority = Priority::P1;
    }

    (priority, priority.severity_score())
}
