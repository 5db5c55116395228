use doctriage::config::Settings;
use doctriage::eval::{
    run_eval, PREDICTIONS_CSV_FILE_NAME, SUMMARY_JSON_FILE_NAME, SUMMARY_MD_FILE_NAME,
};
use doctriage::shared::logging::run_log_path;
use doctriage::synth::{generate_corpus, write_corpus, SynthSettings};
use doctriage::triage::TriageMode;
use std::fs;

fn small_corpus_settings() -> SynthSettings {
    SynthSettings {
        count: 12,
        seed: 7,
        edge_rate: 0.30,
    }
}

#[test]
fn eval_replays_a_generated_corpus_and_writes_all_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("eval_outputs");

    let cases = generate_corpus(&small_corpus_settings());
    let (samples_path, gold_path) = write_corpus(&data_dir, &cases).expect("corpus");

    let artifacts = run_eval(&samples_path, &gold_path, &output_dir, &Settings::default())
        .expect("eval run");

    assert_eq!(artifacts.summary.corpus_size, 12);
    assert_eq!(artifacts.summary.modes.len(), 2);
    for mode in [TriageMode::Workflow, TriageMode::Agent] {
        let metrics = artifacts.summary.modes.get(&mode).expect("mode score");
        assert!(metrics.doc_type_accuracy >= 0.0 && metrics.doc_type_accuracy <= 1.0);
        assert!(metrics.avg_elapsed_ms >= 1.0);
    }
    // The agent pays for its dynamism in tool calls; the workflow never calls tools.
    let workflow = &artifacts.summary.modes[&TriageMode::Workflow];
    let agent = &artifacts.summary.modes[&TriageMode::Agent];
    assert_eq!(workflow.avg_tool_calls, 0.0);
    assert!(agent.avg_tool_calls >= 3.0);

    assert_eq!(artifacts.summary_json, output_dir.join(SUMMARY_JSON_FILE_NAME));
    assert!(artifacts.summary_json.is_file());
    assert!(artifacts.summary_md.is_file());
    assert!(artifacts.predictions_csv.is_file());
}

#[test]
fn summary_json_round_trips_through_serde_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("eval_outputs");

    let cases = generate_corpus(&small_corpus_settings());
    let (samples_path, gold_path) = write_corpus(&data_dir, &cases).expect("corpus");
    let artifacts = run_eval(&samples_path, &gold_path, &output_dir, &Settings::default())
        .expect("eval run");

    let raw = fs::read_to_string(&artifacts.summary_json).expect("summary json");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value["corpus_size"], 12);
    assert!(value["modes"]["workflow"]["doc_type_accuracy"].is_number());
    assert!(value["modes"]["agent"]["escalation_recall"].is_number());
    assert!(value["modes"]["workflow"]["slices"].is_object());
}

#[test]
fn predictions_csv_holds_one_row_per_case_per_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("eval_outputs");

    let cases = generate_corpus(&small_corpus_settings());
    let (samples_path, gold_path) = write_corpus(&data_dir, &cases).expect("corpus");
    let artifacts = run_eval(&samples_path, &gold_path, &output_dir, &Settings::default())
        .expect("eval run");

    let csv = fs::read_to_string(&artifacts.predictions_csv).expect("csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 1 + 2 * 12);
    assert!(lines[0].starts_with("mode,doc_id,doc_type"));
    assert!(lines[1].starts_with("workflow,DOC-0001,"));
}

#[test]
fn markdown_summary_reports_both_modes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("eval_outputs");

    let cases = generate_corpus(&small_corpus_settings());
    let (samples_path, gold_path) = write_corpus(&data_dir, &cases).expect("corpus");
    let artifacts = run_eval(&samples_path, &gold_path, &output_dir, &Settings::default())
        .expect("eval run");

    let md = fs::read_to_string(&artifacts.summary_md).expect("markdown");
    assert!(md.starts_with("# A/B Eval Summary"));
    assert!(md.contains("workflow"));
    assert!(md.contains("agent"));
    assert!(md.contains("DocType Acc"));
    assert!(md.contains("## Slices"));
}

#[test]
fn eval_appends_run_log_lines_under_the_output_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("eval_outputs");

    let cases = generate_corpus(&small_corpus_settings());
    let (samples_path, gold_path) = write_corpus(&data_dir, &cases).expect("corpus");
    run_eval(&samples_path, &gold_path, &output_dir, &Settings::default()).expect("eval run");

    let log = fs::read_to_string(run_log_path(&output_dir)).expect("run log");
    assert!(log.contains("eval_start corpus_size=12"));
    assert!(log.contains("mode=workflow"));
    assert!(log.contains("mode=agent"));
}

#[test]
fn missing_samples_file_surfaces_an_io_error_with_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.jsonl");
    let gold = dir.path().join("gold.jsonl");
    fs::write(&gold, "").expect("gold file");

    let err = run_eval(&missing, &gold, &dir.path().join("out"), &Settings::default())
        .expect_err("should fail");
    assert!(err.to_string().contains("nope.jsonl"));
}
