use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovviewError {
    #[error("{file} does not belong to module {module}")]
    ModuleMismatch { file: String, module: String },

    #[error("{file} has an unusable module-relative path: {reason}")]
    InvalidPath { file: String, reason: &'static str },

    #[error("failed to read source file {path}: {source}")]
    SourceUnavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("no valid coverage profiles found in {0}")]
    EmptyResultSet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CovviewError>;
