//! # Error Taxonomy
//!
//! Every failure the library surfaces is a [`LegitmarkError`]: a single concrete type
//! carrying a closed [`ErrorKind`], a retryable flag, remediation suggestions and a
//! structured [`ErrorContext`]. Callers branch on `kind()` / `is_retryable()` rather
//! than on message text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Library result type
pub type Result<T> = std::result::Result<T, LegitmarkError>;

/// Boxed underlying failure kept for diagnostics
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ConfigurationError,
    NetworkError,
    TimeoutError,
    AuthenticationError,
    ValidationError,
    NotFoundError,
    RateLimitError,
    ServerError,
    UploadError,
    WorkflowError,
    UnknownError,
}

impl ErrorKind {
    /// Wire-style code for this kind (e.g. `NETWORK_ERROR`)
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::TimeoutError => "TIMEOUT_ERROR",
            Self::AuthenticationError => "AUTHENTICATION_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFoundError => "NOT_FOUND_ERROR",
            Self::RateLimitError => "RATE_LIMIT_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::UploadError => "UPLOAD_ERROR",
            Self::WorkflowError => "WORKFLOW_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Retryability a freshly classified error of this kind gets by default
    pub fn default_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::TimeoutError | Self::RateLimitError | Self::ServerError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CONFIGURATION_ERROR" => Ok(Self::ConfigurationError),
            "NETWORK_ERROR" => Ok(Self::NetworkError),
            "TIMEOUT_ERROR" => Ok(Self::TimeoutError),
            "AUTHENTICATION_ERROR" => Ok(Self::AuthenticationError),
            "VALIDATION_ERROR" => Ok(Self::ValidationError),
            "NOT_FOUND_ERROR" => Ok(Self::NotFoundError),
            "RATE_LIMIT_ERROR" => Ok(Self::RateLimitError),
            "SERVER_ERROR" => Ok(Self::ServerError),
            "UPLOAD_ERROR" => Ok(Self::UploadError),
            "WORKFLOW_ERROR" => Ok(Self::WorkflowError),
            "UNKNOWN_ERROR" => Ok(Self::UnknownError),
            _ => Err(format!("Invalid error kind: {s}")),
        }
    }
}

/// Structured context attached to every error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// HTTP status code, when a response was received
    pub status_code: Option<u16>,
    /// Endpoint or URL that was attempted
    pub endpoint: Option<String>,
    /// Backend correlation id from the response headers
    pub request_id: Option<String>,
    /// Arbitrary additional details
    pub details: HashMap<String, Value>,
}

/// The single error type of the library.
///
/// Immutable once constructed; the builder-style `with_*` methods consume and return
/// a new value.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct LegitmarkError {
    kind: ErrorKind,
    message: String,
    retryable: bool,
    suggestions: Vec<String>,
    context: ErrorContext,
    #[source]
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl LegitmarkError {
    /// Create an error whose retryable flag follows the kind's default
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: kind.default_retryable(),
            suggestions: Vec::new(),
            context: ErrorContext::default(),
            cause: None,
        }
    }

    /// Configuration problem (missing API key, bad base URL, ...). Never retryable.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigurationError, message)
            .with_suggestion("Check LEGITMARK_API_KEY and LEGITMARK_BASE_URL")
    }

    /// Workflow precondition violation. Never retryable.
    pub fn workflow(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WorkflowError, message)
    }

    /// Caller-side input rejected before reaching the backend
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    /// Image upload failure outside of transport classification
    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UploadError, message)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions
            .extend(suggestions.into_iter().map(Into::into));
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.context.status_code = Some(status_code);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.context.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.details.insert(key.into(), value);
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn with_boxed_cause(mut self, cause: BoxError) -> Self {
        self.cause = Some(Arc::from(cause));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    pub fn status_code(&self) -> Option<u16> {
        self.context.status_code
    }

    /// The raw underlying failure, if any
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

/// Anything the retry executor's default predicate can judge.
///
/// The default predicate retries only errors that belong to the taxonomy and are
/// flagged retryable.
pub trait RetryableError {
    fn should_retry(&self) -> bool;
}

impl RetryableError for LegitmarkError {
    fn should_retry(&self) -> bool {
        self.retryable
    }
}

impl RetryableError for anyhow::Error {
    fn should_retry(&self) -> bool {
        self.downcast_ref::<LegitmarkError>()
            .is_some_and(LegitmarkError::is_retryable)
    }
}

impl From<serde_json::Error> for LegitmarkError {
    fn from(error: serde_json::Error) -> Self {
        LegitmarkError::new(
            ErrorKind::UnknownError,
            format!("Unexpected response format: {error}"),
        )
        .with_cause(error)
    }
}
