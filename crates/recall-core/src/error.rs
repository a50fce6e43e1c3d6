//! Error types and exit codes for recall
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, invalid frontmatter, etc.)

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the recall CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, invalid frontmatter (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during recall operations
#[derive(Error, Debug)]
pub enum RecallError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid time window: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    // Data/store errors (exit code 3)
    #[error("store not found (searched {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("note not found: {name}")]
    NoteNotFound { name: String },

    #[error("invalid frontmatter in {path:?}: {reason}")]
    InvalidFrontmatter { path: PathBuf, reason: String },

    #[error("refusing to delete protected note: {name}")]
    ProtectedNote { name: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl RecallError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RecallError::UnknownFormat(_)
            | RecallError::UsageError(_)
            | RecallError::InvalidRange { .. } => ExitCode::Usage,

            RecallError::StoreNotFound { .. }
            | RecallError::NoteNotFound { .. }
            | RecallError::InvalidFrontmatter { .. }
            | RecallError::ProtectedNote { .. } => ExitCode::Data,

            RecallError::Io(_)
            | RecallError::Json(_)
            | RecallError::Yaml(_)
            | RecallError::Toml(_)
            | RecallError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier used in the JSON envelope
    fn error_type(&self) -> &'static str {
        match self {
            RecallError::UnknownFormat(_) => "unknown_format",
            RecallError::UsageError(_) => "usage_error",
            RecallError::InvalidRange { .. } => "invalid_range",
            RecallError::StoreNotFound { .. } => "store_not_found",
            RecallError::NoteNotFound { .. } => "note_not_found",
            RecallError::InvalidFrontmatter { .. } => "invalid_frontmatter",
            RecallError::ProtectedNote { .. } => "protected_note",
            RecallError::Io(_) => "io_error",
            RecallError::Json(_) => "json_error",
            RecallError::Yaml(_) => "yaml_error",
            RecallError::Toml(_) => "toml_error",
            RecallError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for recall operations
pub type Result<T> = std::result::Result<T, RecallError>;
