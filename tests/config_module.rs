use doctriage::agent::ToolId;
use doctriage::config::{AgentSettings, ConfigError, Settings};
use std::collections::BTreeSet;
use std::fs;

fn write_settings(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.yaml");
    fs::write(&path, contents).expect("settings file");
    (dir, path)
}

#[test]
fn defaults_match_the_runner_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.workflow.max_retries, 1);
    assert_eq!(settings.agent.max_tool_calls, 6);
    assert_eq!(settings.agent.timeout_ms, 2_000);
    assert_eq!(settings.agent.allowlist, None);
    assert!(settings.validate().is_ok());
}

#[test]
fn yaml_settings_override_individual_fields() {
    let (_dir, path) = write_settings(
        "workflow:\n  max_retries: 2\nagent:\n  max_tool_calls: 4\n  timeout_ms: 500\n",
    );
    let settings = Settings::from_path(&path).expect("settings");
    assert_eq!(settings.workflow.max_retries, 2);
    assert_eq!(settings.agent.max_tool_calls, 4);
    assert_eq!(settings.agent.timeout_ms, 500);
    assert_eq!(settings.agent.allowlist, None);
}

#[test]
fn allowlist_parses_tool_names() {
    let (_dir, path) = write_settings(
        "agent:\n  allowlist:\n    - detect_doc_type\n    - risk_scan\n",
    );
    let settings = Settings::from_path(&path).expect("settings");
    assert_eq!(
        settings.agent.allowlist,
        Some(vec![ToolId::DetectDocType, ToolId::RiskScan])
    );

    let guardrails = settings.agent.guardrails();
    assert_eq!(
        guardrails.allowlist,
        BTreeSet::from([ToolId::DetectDocType, ToolId::RiskScan])
    );
}

#[test]
fn omitted_allowlist_expands_to_every_registered_tool() {
    let guardrails = AgentSettings::default().guardrails();
    assert_eq!(guardrails.allowlist.len(), ToolId::ALL.len());
    for tool in ToolId::ALL {
        assert!(guardrails.allowlist.contains(&tool));
    }
}

#[test]
fn unknown_fields_are_rejected() {
    let (_dir, path) = write_settings("workflow:\n  retries: 2\n");
    let err = Settings::from_path(&path).expect_err("should reject");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn unknown_tool_names_are_rejected() {
    let (_dir, path) = write_settings("agent:\n  allowlist:\n    - summarize\n");
    assert!(matches!(
        Settings::from_path(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn out_of_range_knobs_fail_validation() {
    let (_dir, path) = write_settings("workflow:\n  max_retries: 9\n");
    assert!(matches!(
        Settings::from_path(&path),
        Err(ConfigError::Invalid(_))
    ));

    let (_dir, path) = write_settings("agent:\n  max_tool_calls: 0\n");
    assert!(matches!(
        Settings::from_path(&path),
        Err(ConfigError::Invalid(_))
    ));

    let (_dir, path) = write_settings("agent:\n  timeout_ms: 0\n");
    assert!(matches!(
        Settings::from_path(&path),
        Err(ConfigError::Invalid(_))
    ));

    let (_dir, path) = write_settings("agent:\n  allowlist: []\n");
    assert!(matches!(
        Settings::from_path(&path),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn missing_file_reports_a_read_error_with_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    let err = Settings::from_path(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}
