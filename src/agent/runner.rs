use crate::agent::planner::plan;
use crate::agent::tools::{full_allowlist, AgentContext, ToolId, ToolRegistry};
use crate::triage::{
    build_decision, build_fail_closed_decision, detect_doc_type, elapsed_ms_since,
    validate_triage_decision, DecisionDraft, TriageDecision, TriageError, TriageInput, TriageMode,
    AGENT_MODEL_NAME,
};
use std::collections::BTreeSet;
use std::time::Instant;

const AGENT_RATIONALE: &str = "Dynamic agentic triage with guardrailed tool orchestration.";
const FINAL_VALIDATION_REASON: &str = "Final schema/policy validation failed";

/// Runtime bounds on the agent's autonomy, checked before every tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentGuardrails {
    pub allowlist: BTreeSet<ToolId>,
    pub max_tool_calls: u32,
    pub timeout_ms: u64,
}

impl Default for AgentGuardrails {
    fn default() -> Self {
        Self {
            allowlist: full_allowlist(),
            max_tool_calls: 6,
            timeout_ms: 2_000,
        }
    }
}

/// Dynamically-planned triage: parse -> plan -> execute_tool* -> assemble ->
/// validate -> accept | fail closed.
///
/// Three guardrails are checked, in order, before each planned tool call;
/// any violation short-circuits to a fail-closed decision without attempting
/// the blocked operation. There is no retry in the agent path. `Err` is
/// returned only for input schema violations.
pub fn run_agent(
    input: &TriageInput,
    guardrails: &AgentGuardrails,
) -> Result<TriageDecision, TriageError> {
    let start = Instant::now();
    input.validate()?;

    let mut steps = vec!["parse_input".to_string(), "agent_plan_start".to_string()];
    let planned_tools = plan(input);
    let registry = ToolRegistry::standard();
    let mut context = AgentContext::new(detect_doc_type(
        &input.content,
        input.doc_type_hint.as_deref(),
    ));
    let mut tool_calls: u32 = 0;

    for tool_id in planned_tools {
        if !guardrails.allowlist.contains(&tool_id) {
            steps.push(format!("guardrail_allowlist_block:{tool_id}"));
            return Ok(build_fail_closed_decision(
                input,
                TriageMode::Agent,
                steps,
                tool_calls,
                0,
                elapsed_ms_since(start),
                format!("Guardrail violation: tool '{tool_id}' not in allowlist"),
            ));
        }

        if tool_calls >= guardrails.max_tool_calls {
            steps.push("guardrail_tool_budget_exceeded".to_string());
            return Ok(build_fail_closed_decision(
                input,
                TriageMode::Agent,
                steps,
                tool_calls,
                0,
                elapsed_ms_since(start),
                "Guardrail violation: max tool calls exceeded".to_string(),
            ));
        }

        if elapsed_ms_since(start) > guardrails.timeout_ms {
            steps.push("guardrail_timeout".to_string());
            return Ok(build_fail_closed_decision(
                input,
                TriageMode::Agent,
                steps,
                tool_calls,
                0,
                elapsed_ms_since(start),
                "Guardrail violation: agent timeout budget exceeded".to_string(),
            ));
        }

        steps.push(format!("tool:{tool_id}"));
        registry.execute(tool_id, input, &mut context);
        tool_calls += 1;
    }

    steps.push("assemble_candidate".to_string());
    let candidate = build_decision(
        input,
        DecisionDraft {
            mode: TriageMode::Agent,
            doc_type: context.inferred_doc_type,
            steps: steps.clone(),
            tool_calls,
            retry_count: 0,
            elapsed_ms: elapsed_ms_since(start),
            model_name: AGENT_MODEL_NAME,
            confidence: 0.84,
            rationale: AGENT_RATIONALE,
            queue_override: None,
        },
    );

    // Construction failure and validator disagreement both fail closed
    // immediately; the agent path never retries.
    let mut decision = match candidate {
        Ok(decision) => decision,
        Err(_) => {
            steps.push("final_validation_fail_closed".to_string());
            return Ok(build_fail_closed_decision(
                input,
                TriageMode::Agent,
                steps,
                tool_calls,
                0,
                elapsed_ms_since(start),
                FINAL_VALIDATION_REASON.to_string(),
            ));
        }
    };

    let violations = validate_triage_decision(input, &decision);
    if !violations.is_empty() {
        steps.push("final_validation_fail_closed".to_string());
        return Ok(build_fail_closed_decision(
            input,
            TriageMode::Agent,
            steps,
            tool_calls,
            0,
            elapsed_ms_since(start),
            FINAL_VALIDATION_REASON.to_string(),
        ));
    }

    decision.decision_trace.elapsed_ms = elapsed_ms_since(start);
    Ok(decision)
}
