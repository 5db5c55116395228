use crate::agent::run_agent;
use crate::config::Settings;
use crate::eval::error::{io_error, json_error, EvalError};
use crate::eval::metrics::{gold_index, score, GoldLabel, ModeScore};
use crate::eval::report::{render_markdown_summary, render_predictions_csv};
use crate::shared::fs_atomic::atomic_write_file;
use crate::shared::logging::append_run_log_line;
use crate::triage::{TriageDecision, TriageInput, TriageMode};
use crate::workflow::run_workflow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_JSON_FILE_NAME: &str = "ab_eval_summary.json";
pub const SUMMARY_MD_FILE_NAME: &str = "ab_eval_summary.md";
pub const PREDICTIONS_CSV_FILE_NAME: &str = "per_case_predictions.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalSummary {
    pub corpus_size: usize,
    pub modes: BTreeMap<TriageMode, ModeScore>,
}

#[derive(Debug, Clone)]
pub struct EvalArtifacts {
    pub summary: EvalSummary,
    pub summary_json: PathBuf,
    pub summary_md: PathBuf,
    pub predictions_csv: PathBuf,
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, EvalError> {
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let mut rows = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(trimmed).map_err(|source| json_error(path, source))?);
    }
    Ok(rows)
}

pub fn read_samples(path: &Path) -> Result<Vec<TriageInput>, EvalError> {
    read_jsonl(path)
}

pub fn read_gold(path: &Path) -> Result<Vec<GoldLabel>, EvalError> {
    read_jsonl(path)
}

/// Replay every sample through one runner, sequentially. Malformed inputs
/// abort the replay; every post-parse failure is already absorbed into a
/// fail-closed decision by the runners themselves.
pub fn run_mode(
    mode: TriageMode,
    samples: &[TriageInput],
    settings: &Settings,
) -> Result<Vec<TriageDecision>, EvalError> {
    let guardrails = settings.agent.guardrails();
    let mut decisions = Vec::with_capacity(samples.len());
    for sample in samples {
        let decision = match mode {
            TriageMode::Workflow => run_workflow(sample, &settings.workflow)?,
            TriageMode::Agent => run_agent(sample, &guardrails)?,
        };
        decisions.push(decision);
    }
    Ok(decisions)
}

/// A/B replay: run both runners over the corpus, score each against the gold
/// labels, and write the summary/report artifacts into `output_dir`.
pub fn run_eval(
    samples_path: &Path,
    gold_path: &Path,
    output_dir: &Path,
    settings: &Settings,
) -> Result<EvalArtifacts, EvalError> {
    let samples = read_samples(samples_path)?;
    let gold = gold_index(read_gold(gold_path)?);

    fs::create_dir_all(output_dir).map_err(|source| io_error(output_dir, source))?;
    let _ = append_run_log_line(
        output_dir,
        &format!("eval_start corpus_size={}", samples.len()),
    );

    let mut modes = BTreeMap::new();
    let mut all_predictions = Vec::new();
    for mode in [TriageMode::Workflow, TriageMode::Agent] {
        let predictions = run_mode(mode, &samples, settings)?;
        let _ = append_run_log_line(
            output_dir,
            &format!("mode={mode} cases={} scored", predictions.len()),
        );
        modes.insert(mode, score(&predictions, &gold));
        all_predictions.extend(predictions);
    }

    let summary = EvalSummary {
        corpus_size: samples.len(),
        modes,
    };

    let summary_json = output_dir.join(SUMMARY_JSON_FILE_NAME);
    let summary_md = output_dir.join(SUMMARY_MD_FILE_NAME);
    let predictions_csv = output_dir.join(PREDICTIONS_CSV_FILE_NAME);

    let json_payload = serde_json::to_vec_pretty(&summary)
        .map_err(|source| json_error(&summary_json, source))?;
    atomic_write_file(&summary_json, &json_payload)
        .map_err(|source| io_error(&summary_json, source))?;
    atomic_write_file(&summary_md, render_markdown_summary(&summary).as_bytes())
        .map_err(|source| io_error(&summary_md, source))?;
    atomic_write_file(
        &predictions_csv,
        render_predictions_csv(&all_predictions).as_bytes(),
    )
    .map_err(|source| io_error(&predictions_csv, source))?;

    Ok(EvalArtifacts {
        summary,
        summary_json,
        summary_md,
        predictions_csv,
    })
}
