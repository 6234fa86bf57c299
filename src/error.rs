use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Input validation failures raised by the retention engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetentionError {
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid retention policy: {0}")]
    InvalidPolicy(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported plan format for {0} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Retention(#[from] RetentionError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("could not write plan: {0}")]
    Report(#[from] ReportError),
}

pub type BackupResult<T> = Result<T, BackupError>;
