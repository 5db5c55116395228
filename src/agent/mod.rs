pub mod planner;
pub mod runner;
pub mod tools;

pub use planner::plan;
pub use runner::{run_agent, AgentGuardrails};
pub use tools::{full_allowlist, AgentContext, Tool, ToolId, ToolRegistry};
