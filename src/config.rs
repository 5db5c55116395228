use crate::agent::{full_allowlist, AgentGuardrails, ToolId};
use crate::workflow::WorkflowSettings;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSettings {
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// When unset, every registered tool is allowed.
    #[serde(default)]
    pub allowlist: Option<Vec<ToolId>>,
}

fn default_max_tool_calls() -> u32 {
    6
}

fn default_timeout_ms() -> u64 {
    2_000
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_calls: default_max_tool_calls(),
            timeout_ms: default_timeout_ms(),
            allowlist: None,
        }
    }
}

impl AgentSettings {
    pub fn guardrails(&self) -> AgentGuardrails {
        AgentGuardrails {
            allowlist: match &self.allowlist {
                Some(tools) => tools.iter().copied().collect(),
                None => full_allowlist(),
            },
            max_tool_calls: self.max_tool_calls,
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Runner knobs, optionally loaded from a YAML settings file. Defaults match
/// the hard-coded runner defaults so a missing file changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub workflow: WorkflowSettings,
    #[serde(default)]
    pub agent: AgentSettings,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.max_retries > 5 {
            return Err(ConfigError::Invalid(
                "workflow.max_retries must be a small bound (at most 5)".to_string(),
            ));
        }
        if self.agent.max_tool_calls == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_tool_calls must be at least 1".to_string(),
            ));
        }
        if self.agent.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "agent.timeout_ms must be at least 1".to_string(),
            ));
        }
        if let Some(allowlist) = &self.agent.allowlist {
            if allowlist.is_empty() {
                return Err(ConfigError::Invalid(
                    "agent.allowlist must name at least one tool when present".to_string(),
                ));
            }
        }
        Ok(())
    }
}
