use crate::triage::{detect_doc_type, find_required_missing_fields, CustomerTier, DocType, TriageInput};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Closed set of tool identifiers shared by the planner, the allowlist, and
/// the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    DetectDocType,
    ExtractMetadata,
    CheckCompleteness,
    LookupPolicyContext,
    RiskScan,
}

impl ToolId {
    pub const ALL: [ToolId; 5] = [
        Self::DetectDocType,
        Self::ExtractMetadata,
        Self::CheckCompleteness,
        Self::LookupPolicyContext,
        Self::RiskScan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DetectDocType => "detect_doc_type",
            Self::ExtractMetadata => "extract_metadata",
            Self::CheckCompleteness => "check_completeness",
            Self::LookupPolicyContext => "lookup_policy_context",
            Self::RiskScan => "risk_scan",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "detect_doc_type" => Ok(Self::DetectDocType),
            "extract_metadata" => Ok(Self::ExtractMetadata),
            "check_completeness" => Ok(Self::CheckCompleteness),
            "lookup_policy_context" => Ok(Self::LookupPolicyContext),
            "risk_scan" => Ok(Self::RiskScan),
            _ => Err(format!("unknown tool `{raw}`")),
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn full_allowlist() -> BTreeSet<ToolId> {
    ToolId::ALL.into_iter().collect()
}

/// Mutable working state accumulated across tool executions within one agent
/// run. Owned exclusively by the runner invocation.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub inferred_doc_type: DocType,
    pub outputs: BTreeMap<ToolId, Value>,
}

impl AgentContext {
    pub fn new(inferred_doc_type: DocType) -> Self {
        Self {
            inferred_doc_type,
            outputs: BTreeMap::new(),
        }
    }
}

/// An in-process capability the agent runner may invoke. Tools are pure
/// computations over the input; the only context mutation is the inferred
/// document type updated by `detect_doc_type`.
pub trait Tool {
    fn id(&self) -> ToolId;
    fn execute(&self, input: &TriageInput, context: &mut AgentContext) -> Value;
}

struct DetectDocTypeTool;

impl Tool for DetectDocTypeTool {
    fn id(&self) -> ToolId {
        ToolId::DetectDocType
    }

    fn execute(&self, input: &TriageInput, context: &mut AgentContext) -> Value {
        let doc_type = detect_doc_type(&input.content, input.doc_type_hint.as_deref());
        context.inferred_doc_type = doc_type;
        json!({ "doc_type": doc_type })
    }
}

struct ExtractMetadataTool;

impl Tool for ExtractMetadataTool {
    fn id(&self) -> ToolId {
        ToolId::ExtractMetadata
    }

    fn execute(&self, input: &TriageInput, _context: &mut AgentContext) -> Value {
        let keys: Vec<&str> = input.metadata.keys().map(String::as_str).collect();
        json!({ "metadata_keys": keys })
    }
}

struct CheckCompletenessTool;

impl Tool for CheckCompletenessTool {
    fn id(&self) -> ToolId {
        ToolId::CheckCompleteness
    }

    fn execute(&self, input: &TriageInput, context: &mut AgentContext) -> Value {
        let missing = find_required_missing_fields(context.inferred_doc_type, &input.metadata);
        json!({ "required_missing_fields": missing })
    }
}

struct LookupPolicyContextTool;

impl Tool for LookupPolicyContextTool {
    fn id(&self) -> ToolId {
        ToolId::LookupPolicyContext
    }

    fn execute(&self, input: &TriageInput, _context: &mut AgentContext) -> Value {
        json!({
            "customer_tier": input.customer_tier,
            "region": input.region,
            "requires_heightened_review": input.customer_tier == Some(CustomerTier::Enterprise),
        })
    }
}

struct RiskScanTool;

const RISK_TOKENS: [&str; 6] = [
    "admin",
    "privileged",
    "contractor",
    "outage",
    "incident",
    "regulated",
];

impl Tool for RiskScanTool {
    fn id(&self) -> ToolId {
        ToolId::RiskScan
    }

    fn execute(&self, input: &TriageInput, _context: &mut AgentContext) -> Value {
        let content_lower = input.content.to_lowercase();
        let found: Vec<&str> = RISK_TOKENS
            .iter()
            .copied()
            .filter(|token| content_lower.contains(token))
            .collect();
        json!({ "risk_tokens": found, "risk_score": found.len() })
    }
}

/// Registry mapping every tool identifier to its capability.
pub struct ToolRegistry {
    tools: BTreeMap<ToolId, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn standard() -> Self {
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(DetectDocTypeTool),
            Box::new(ExtractMetadataTool),
            Box::new(CheckCompletenessTool),
            Box::new(LookupPolicyContextTool),
            Box::new(RiskScanTool),
        ];
        Self {
            tools: tools.into_iter().map(|tool| (tool.id(), tool)).collect(),
        }
    }

    /// Execute one tool, recording its named output in the context.
    pub fn execute(&self, tool_id: ToolId, input: &TriageInput, context: &mut AgentContext) {
        if let Some(tool) = self.tools.get(&tool_id) {
            let output = tool.execute(input, context);
            context.outputs.insert(tool_id, output);
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
