use crate::commands;

/// Process-facing entry point. The binary hands its argument vector here and
/// prints whatever comes back; every triage verb and option is handled in
/// `commands`, so embedders can drive the same surface without a subprocess.
pub fn run(args: Vec<String>) -> Result<String, String> {
    commands::run_cli(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn run_accepts_triage_verbs_and_rejects_the_rest() {
        let help = run(args(&["help"])).expect("help output");
        assert!(help.contains("fixed workflow runner"));
        assert!(help.contains("guardrailed agent runner"));
        assert!(help.contains("--edge-rate"));

        let err = run(args(&["replay"])).expect_err("unknown verb");
        assert!(err.contains("unknown command `replay`"));
    }

    #[test]
    fn run_with_no_arguments_prints_usage_instead_of_failing() {
        let output = run(Vec::new()).expect("usage output");
        assert!(output.contains("Commands:"));
        assert!(output.contains("generate"));
    }
}
