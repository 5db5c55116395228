use crate::config::Settings;
use crate::eval::harness::{read_samples, run_eval, run_mode};
use crate::synth::{generate_corpus, write_corpus, SynthSettings};
use crate::triage::{TriageDecision, TriageMode};
use serde_json::json;
use std::path::PathBuf;

const PER_CASE_PRINT_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Workflow,
    Agent,
    Both,
    Eval,
    Generate,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "workflow" => CliVerb::Workflow,
        "agent" => CliVerb::Agent,
        "both" => CliVerb::Both,
        "eval" => CliVerb::Eval,
        "generate" => CliVerb::Generate,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  workflow                             Replay samples through the fixed workflow runner"
            .to_string(),
        "  agent                                Replay samples through the guardrailed agent runner"
            .to_string(),
        "  both                                 Replay samples through both runners".to_string(),
        "  eval                                 Run the A/B replay and score against gold labels"
            .to_string(),
        "  generate                             Generate a deterministic synthetic corpus"
            .to_string(),
        String::new(),
        "Options:".to_string(),
        "  --samples <path>                     Samples JSONL (default data/samples.jsonl)"
            .to_string(),
        "  --gold <path>                        Gold JSONL, eval only (default data/gold.jsonl)"
            .to_string(),
        "  --out <dir>                          Eval artifact directory (default eval_outputs)"
            .to_string(),
        "  --limit <n>                          Max rows for workflow/agent/both (default 10)"
            .to_string(),
        "  --config <path>                      Optional YAML runner settings".to_string(),
        "  --data-dir <dir>                     Corpus directory for generate (default data)"
            .to_string(),
        "  --count <n>                          Documents to generate (default 200)".to_string(),
        "  --seed <n>                           Generator seed (default 42)".to_string(),
        "  --edge-rate <f>                      Edge-case injection rate (default 0.30)"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

#[derive(Debug, Clone)]
struct CliOptions {
    samples: PathBuf,
    gold: PathBuf,
    out: PathBuf,
    limit: usize,
    config: Option<PathBuf>,
    data_dir: PathBuf,
    count: u32,
    seed: u64,
    edge_rate: f64,
}

impl Default for CliOptions {
    fn default() -> Self {
        let synth = SynthSettings::default();
        Self {
            samples: PathBuf::from("data/samples.jsonl"),
            gold: PathBuf::from("data/gold.jsonl"),
            out: PathBuf::from("eval_outputs"),
            limit: 10,
            config: None,
            data_dir: PathBuf::from("data"),
            count: synth.count,
            seed: synth.seed,
            edge_rate: synth.edge_rate,
        }
    }
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag.as_str() {
            "--samples" => options.samples = PathBuf::from(value_for("--samples")?),
            "--gold" => options.gold = PathBuf::from(value_for("--gold")?),
            "--out" => options.out = PathBuf::from(value_for("--out")?),
            "--limit" => {
                options.limit = value_for("--limit")?
                    .parse()
                    .map_err(|_| "--limit must be a non-negative integer".to_string())?;
            }
            "--config" => options.config = Some(PathBuf::from(value_for("--config")?)),
            "--data-dir" => options.data_dir = PathBuf::from(value_for("--data-dir")?),
            "--count" => {
                options.count = value_for("--count")?
                    .parse()
                    .map_err(|_| "--count must be a non-negative integer".to_string())?;
            }
            "--seed" => {
                options.seed = value_for("--seed")?
                    .parse()
                    .map_err(|_| "--seed must be a non-negative integer".to_string())?;
            }
            "--edge-rate" => {
                options.edge_rate = value_for("--edge-rate")?
                    .parse()
                    .map_err(|_| "--edge-rate must be a number in [0, 1]".to_string())?;
            }
            other => return Err(format!("unknown option `{other}`\n\n{}", help_text())),
        }
    }
    if !(0.0..=1.0).contains(&options.edge_rate) {
        return Err("--edge-rate must be a number in [0, 1]".to_string());
    }
    Ok(options)
}

fn load_settings(options: &CliOptions) -> Result<Settings, String> {
    match &options.config {
        Some(path) => Settings::from_path(path).map_err(|err| err.to_string()),
        None => Ok(Settings::default()),
    }
}

fn short_result(decision: &TriageDecision) -> String {
    let trace = &decision.decision_trace;
    json!({
        "doc_id": decision.doc_id,
        "doc_type": decision.doc_type,
        "priority": decision.priority,
        "queue": decision.recommended_queue,
        "escalate": decision.escalate,
        "missing": decision.required_missing_fields,
        "tool_calls": trace.tool_calls,
        "elapsed_ms": trace.elapsed_ms,
    })
    .to_string()
}

fn run_per_case(mode: TriageMode, options: &CliOptions, settings: &Settings) -> Result<String, String> {
    let mut samples = read_samples(&options.samples).map_err(|err| err.to_string())?;
    samples.truncate(options.limit);

    let decisions = run_mode(mode, &samples, settings).map_err(|err| err.to_string())?;

    let mut lines = vec![json!({ "mode": mode, "cases": decisions.len() }).to_string()];
    for decision in decisions.iter().take(PER_CASE_PRINT_LIMIT) {
        lines.push(short_result(decision));
    }
    Ok(lines.join("\n"))
}

fn cmd_eval(options: &CliOptions, settings: &Settings) -> Result<String, String> {
    let artifacts = run_eval(&options.samples, &options.gold, &options.out, settings)
        .map_err(|err| err.to_string())?;
    Ok(json!({
        "mode": "eval",
        "corpus_size": artifacts.summary.corpus_size,
        "summary_json": artifacts.summary_json,
        "summary_md": artifacts.summary_md,
        "predictions_csv": artifacts.predictions_csv,
    })
    .to_string())
}

fn cmd_generate(options: &CliOptions) -> Result<String, String> {
    let settings = SynthSettings {
        count: options.count,
        seed: options.seed,
        edge_rate: options.edge_rate,
    };
    let cases = generate_corpus(&settings);
    let (samples_path, gold_path) =
        write_corpus(&options.data_dir, &cases).map_err(|err| err.to_string())?;
    Ok(format!(
        "Generated {} samples: {}\nGenerated {} gold labels: {}",
        cases.len(),
        samples_path.display(),
        cases.len(),
        gold_path.display(),
    ))
}

/// Shared CLI engine behind the binary: first argument selects the verb, the
/// rest are `--flag value` options.
pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let Some((verb_raw, rest)) = args.split_first() else {
        return Ok(help_text());
    };

    let verb = parse_cli_verb(verb_raw);
    if verb == CliVerb::Help {
        return Ok(help_text());
    }
    if verb == CliVerb::Unknown {
        return Err(format!("unknown command `{verb_raw}`\n\n{}", help_text()));
    }

    let options = parse_options(rest)?;
    let settings = load_settings(&options)?;

    match verb {
        CliVerb::Workflow => run_per_case(TriageMode::Workflow, &options, &settings),
        CliVerb::Agent => run_per_case(TriageMode::Agent, &options, &settings),
        CliVerb::Both => {
            let workflow = run_per_case(TriageMode::Workflow, &options, &settings)?;
            let agent = run_per_case(TriageMode::Agent, &options, &settings)?;
            Ok(format!("{workflow}\n{agent}"))
        }
        CliVerb::Eval => cmd_eval(&options, &settings),
        CliVerb::Generate => cmd_generate(&options),
        CliVerb::Help | CliVerb::Unknown => Ok(help_text()),
    }
}
