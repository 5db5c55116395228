pub mod error;
pub mod harness;
pub mod metrics;
pub mod report;

pub use error::EvalError;
pub use harness::{
    read_gold, read_samples, run_eval, run_mode, EvalArtifacts, EvalSummary,
    PREDICTIONS_CSV_FILE_NAME, SUMMARY_JSON_FILE_NAME, SUMMARY_MD_FILE_NAME,
};
pub use metrics::{edge_case_flag, gold_index, score, GoldIndex, GoldLabel, ModeScore, SliceScore};
pub use report::{render_markdown_summary, render_predictions_csv};
