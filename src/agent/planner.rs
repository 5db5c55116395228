use crate::agent::tools::ToolId;
use crate::triage::TriageInput;

const PRIVILEGED_TOKENS: [&str; 4] = ["admin", "contractor", "privileged", "regulated"];
const INCIDENT_TOKENS: [&str; 4] = ["incident", "latency", "outage", "error"];

/// Select an ordered tool sequence for this input. This is a static decision
/// table keyed on content keywords, not a search: privileged/regulated
/// language gets the policy-context plan, incident language gets the
/// metadata-extraction plan, everything else the default three-tool plan.
pub fn plan(input: &TriageInput) -> Vec<ToolId> {
    let content = input.content.to_lowercase();

    if PRIVILEGED_TOKENS.iter().any(|token| content.contains(token)) {
        return vec![
            ToolId::DetectDocType,
            ToolId::LookupPolicyContext,
            ToolId::RiskScan,
            ToolId::CheckCompleteness,
        ];
    }

    if INCIDENT_TOKENS.iter().any(|token| content.contains(token)) {
        return vec![
            ToolId::DetectDocType,
            ToolId::ExtractMetadata,
            ToolId::CheckCompleteness,
            ToolId::RiskScan,
        ];
    }

    vec![
        ToolId::DetectDocType,
        ToolId::ExtractMetadata,
        ToolId::CheckCompleteness,
    ]
}
