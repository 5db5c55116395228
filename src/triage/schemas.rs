use crate::triage::error::TriageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Portal,
    Attachment,
    Api,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Portal => "portal",
            Self::Attachment => "attachment",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Enterprise,
    Growth,
    Standard,
}

impl CustomerTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enterprise => "enterprise",
            Self::Growth => "growth",
            Self::Standard => "standard",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "enterprise" => Ok(Self::Enterprise),
            "growth" => Ok(Self::Growth),
            "standard" => Ok(Self::Standard),
            _ => Err("customer tier must be one of: enterprise, growth, standard".to_string()),
        }
    }
}

impl std::fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Na,
    Eu,
    Apac,
    Latam,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Na => "NA",
            Self::Eu => "EU",
            Self::Apac => "APAC",
            Self::Latam => "LATAM",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    IncidentReport,
    AccessRequest,
    SecurityQuestionnaire,
    BillingDispute,
    FeatureRequest,
}

impl DocType {
    /// Declared order is load-bearing: the classifier iterates it for
    /// tie-breaks and `FeatureRequest` (last) is the all-zero fallback.
    pub const ALL: [DocType; 5] = [
        Self::IncidentReport,
        Self::AccessRequest,
        Self::SecurityQuestionnaire,
        Self::BillingDispute,
        Self::FeatureRequest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncidentReport => "incident_report",
            Self::AccessRequest => "access_request",
            Self::SecurityQuestionnaire => "security_questionnaire",
            Self::BillingDispute => "billing_dispute",
            Self::FeatureRequest => "feature_request",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "incident_report" => Ok(Self::IncidentReport),
            "access_request" => Ok(Self::AccessRequest),
            "security_questionnaire" => Ok(Self::SecurityQuestionnaire),
            "billing_dispute" => Ok(Self::BillingDispute),
            "feature_request" => Ok(Self::FeatureRequest),
            _ => Err(format!("unknown document type `{raw}`")),
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    /// Severity is a fixed function of the final priority.
    pub fn severity_score(self) -> u8 {
        match self {
            Self::P1 => 5,
            Self::P2 => 3,
            Self::P3 => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageMode {
    Workflow,
    Agent,
}

impl TriageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::Agent => "agent",
        }
    }
}

impl std::fmt::Display for TriageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed value variant for metadata entries. Required-field presence checks
/// key off the map keys, so the value side only needs to round-trip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl MetaValue {
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

pub type Metadata = BTreeMap<String, MetaValue>;

/// One inbound document. Constructed once per case, never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriageInput {
    pub doc_id: String,
    pub channel: Channel,
    pub customer_id: String,
    #[serde(default)]
    pub customer_tier: Option<CustomerTier>,
    pub region: Region,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub doc_type_hint: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl TriageInput {
    /// Input schema check, run by both runners before their state machines
    /// start. This is the only failure that propagates to the caller.
    pub fn validate(&self) -> Result<(), TriageError> {
        for (field, value) in [
            ("doc_id", self.doc_id.as_str()),
            ("customer_id", self.customer_id.as_str()),
            ("content", self.content.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(TriageError::EmptyInputField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Audit trail attached to every decision: ordered step labels plus counters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DecisionTrace {
    pub mode: TriageMode,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tool_calls: u32,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// The single output contract shared by both runners.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TriageDecision {
    pub doc_id: String,
    pub doc_type: DocType,
    pub priority: Priority,
    pub severity_score: u8,
    pub recommended_queue: String,
    pub required_missing_fields: Vec<String>,
    pub escalate: bool,
    pub escalation_reason: Option<String>,
    pub confidence: f64,
    pub rationale: String,
    pub decision_trace: DecisionTrace,
}

pub struct TriageDecisionParts {
    pub doc_id: String,
    pub doc_type: DocType,
    pub priority: Priority,
    pub recommended_queue: String,
    pub required_missing_fields: Vec<String>,
    pub escalate: bool,
    pub escalation_reason: Option<String>,
    pub confidence: f64,
    pub rationale: String,
    pub decision_trace: DecisionTrace,
}

impl TriageDecision {
    /// Validating constructor. The escalate/reason pairing is a hard
    /// invariant: escalate=true without a reason, or a reason without
    /// escalate, never leaves this function.
    pub fn new(parts: TriageDecisionParts) -> Result<Self, TriageError> {
        if parts.doc_id.trim().is_empty() {
            return Err(TriageError::EmptyInputField {
                field: "doc_id".to_string(),
            });
        }
        match (parts.escalate, parts.escalation_reason.as_deref()) {
            (true, None) | (true, Some("")) => return Err(TriageError::EscalationReasonMissing),
            (false, Some(_)) => return Err(TriageError::EscalationReasonUnexpected),
            _ => {}
        }
        if !(0.0..=1.0).contains(&parts.confidence) {
            return Err(TriageError::ConfidenceOutOfRange {
                confidence: parts.confidence,
            });
        }
        let severity_score = parts.priority.severity_score();
        Ok(Self {
            doc_id: parts.doc_id,
            doc_type: parts.doc_type,
            priority: parts.priority,
            severity_score,
            recommended_queue: parts.recommended_queue,
            required_missing_fields: parts.required_missing_fields,
            escalate: parts.escalate,
            escalation_reason: parts.escalation_reason,
            confidence: parts.confidence,
            rationale: parts.rationale,
            decision_trace: parts.decision_trace,
        })
    }
}
