use std::path::PathBuf;

use service_builder_dsl::ParseError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage error
/// - 3: parse error in a model file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ParseError = 3,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The first parse error of a single model file.
    #[error("{error}")]
    Parse {
        error: Box<ParseError>,
        source_text: String,
        file: PathBuf,
    },

    /// Some files failed to parse; their errors were already rendered.
    #[error("{failed} of {total} files failed to parse")]
    ParseFailed { failed: usize, total: usize },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Model file or directory not found.
    #[error("no model files found in {path}")]
    NoModelFiles { path: PathBuf },

    /// `inspect --model` named a model that no file defines.
    #[error("model '{name}' not found")]
    ModelNotFound { name: String },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Parse { .. } | Self::ParseFailed { .. } => ExitCode::ParseError,
            Self::Config { .. } | Self::NoModelFiles { .. } => ExitCode::InvalidArguments,
            Self::Io { .. } | Self::ModelNotFound { .. } | Self::Other(_) => {
                ExitCode::GeneralError
            }
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Parse { error, file, .. } => serde_json::json!({
                "error": "parse_error",
                "file": file.display().to_string(),
                "message": error.error().to_string(),
                "line": error.position().map(|p| p.line),
                "column": error.position().map(|p| p.column),
                "models_parsed": error.partial().len(),
            }),
            Self::ParseFailed { failed, total } => serde_json::json!({
                "error": "parse_error",
                "failed": failed,
                "total": total,
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
