//! Error types.
//!
//! `AppError` is the binary-facing error: a message plus the process exit code.
//! The library layers use typed `thiserror` enums and convert at the edge.
//!
//! Exit codes:
//! - 2: client/input fault (bad arguments, invalid payload, unreadable CSV)
//! - 3: model unavailable
//! - 4: internal failure

use serde::Serialize;
use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a single payload field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    ExpectedNumber,
    ExpectedInteger,
    NotAnObject,
    MalformedJson,
}

impl FieldProblem {
    fn describe(self) -> &'static str {
        match self {
            FieldProblem::Missing => "field required",
            FieldProblem::ExpectedNumber => "expected a number",
            FieldProblem::ExpectedInteger => "expected an integer",
            FieldProblem::NotAnObject => "expected a JSON object",
            FieldProblem::MalformedJson => "not valid JSON",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub problem: FieldProblem,
}

/// A payload that could not be turned into a `LoanApplication`.
///
/// Always lists every offending field, never just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid loan application: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.field.clone()).collect()
    }

    pub fn names(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn summarize(fields: &[FieldError]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| format!("{} ({})", f.field, f.problem.describe()))
        .collect();
    parts.join(", ")
}

/// Failures of the classifier artifact or its inference.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Errors surfaced by `ScoringService::assess`.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model unavailable")]
    ModelUnavailable { reason: String },

    /// The cause is for logs only; callers see the generic message.
    #[error("internal scoring error")]
    Unexpected { cause: String },
}

impl ScoringError {
    pub fn unexpected(cause: impl Into<String>) -> Self {
        ScoringError::Unexpected {
            cause: cause.into(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::from(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    ModelUnavailable,
    InternalError,
}

/// Structured error body handed to whatever transport sits in front of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl ErrorResponse {
    pub fn status_code(&self) -> u16 {
        match self.error {
            ErrorKind::ValidationError => 422,
            ErrorKind::ModelUnavailable => 503,
            ErrorKind::InternalError => 500,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.error == ErrorKind::ValidationError
    }
}

impl From<&ScoringError> for ErrorResponse {
    fn from(err: &ScoringError) -> Self {
        match err {
            ScoringError::Validation(v) => ErrorResponse {
                error: ErrorKind::ValidationError,
                message: v.to_string(),
                fields: v.field_names(),
            },
            ScoringError::ModelUnavailable { .. } => ErrorResponse {
                error: ErrorKind::ModelUnavailable,
                message: "Model not loaded".to_string(),
                fields: Vec::new(),
            },
            ScoringError::Unexpected { .. } => ErrorResponse {
                error: ErrorKind::InternalError,
                message: "Internal scoring error".to_string(),
                fields: Vec::new(),
            },
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        let code = match &err {
            ScoringError::Validation(_) => 2,
            ScoringError::ModelUnavailable { .. } => 3,
            ScoringError::Unexpected { .. } => 4,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::new(3, err.to_string())
    }
}
