use crate::triage::TriageError;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("triage input rejected: {0}")]
    Triage(#[from] TriageError),
}

pub(crate) fn io_error(path: &std::path::Path, source: std::io::Error) -> EvalError {
    EvalError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub(crate) fn json_error(path: &std::path::Path, source: serde_json::Error) -> EvalError {
    EvalError::Json {
        path: path.display().to_string(),
        source,
    }
}
