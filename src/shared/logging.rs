use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const RUN_LOG_RELATIVE: &str = "logs/eval_run.log";

/// Location of the append-only replay log inside an eval output directory.
pub fn run_log_path(output_dir: &Path) -> PathBuf {
    output_dir.join(RUN_LOG_RELATIVE)
}

/// Append one progress line, creating the log directory on first use.
pub fn append_run_log_line(output_dir: &Path, line: &str) -> std::io::Result<()> {
    let path = run_log_path(output_dir);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?
        .write_all(format!("{line}\n").as_bytes())
}
