//! # Transport Abstraction
//!
//! The resource layer talks to the backend only through [`Transport`]. Implementations
//! classify every failure into a [`LegitmarkError`](crate::error::LegitmarkError)
//! before returning it, so nothing above this module inspects raw HTTP failures.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::Result;

pub mod error_classifier;
pub mod http;

pub use error_classifier::{classify_error, classify_failure};
pub use http::HttpTransport;

/// Query parameters for a GET request, in insertion order
pub type QueryParams = Vec<(String, String)>;

/// Minimal capability the resource layer needs from the network
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `endpoint` (relative to the configured base URL) and decode the JSON body
    async fn get(&self, endpoint: &str, query: &QueryParams) -> Result<Value>;

    /// POST an optional JSON body to `endpoint` and decode the JSON response
    async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value>;

    /// PUT raw bytes to an absolute (signed) URL
    async fn upload_bytes(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;
}

/// A failed transport operation before classification
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The request never produced a response
    NoResponse {
        /// The client-side deadline elapsed
        timed_out: bool,
        reason: String,
    },
    /// The backend answered with a non-success status
    Response {
        status: u16,
        body: Option<Value>,
        /// Lower-cased header names
        headers: HashMap<String, String>,
    },
}

impl TransportFailure {
    pub fn timeout(reason: impl Into<String>) -> Self {
        Self::NoResponse {
            timed_out: true,
            reason: reason.into(),
        }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::NoResponse {
            timed_out: false,
            reason: reason.into(),
        }
    }

    pub fn status(status: u16, body: Option<Value>) -> Self {
        Self::Response {
            status,
            body,
            headers: HashMap::new(),
        }
    }

    /// Attach a response header (ignored for `NoResponse`)
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Self::Response { headers, .. } = &mut self {
            headers.insert(name.to_ascii_lowercase(), value.into());
        }
        self
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::NoResponse { .. } => None,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse {
                timed_out: true,
                reason,
            } => write!(f, "request timed out: {reason}"),
            Self::NoResponse { reason, .. } => write!(f, "no response received: {reason}"),
            Self::Response { status, .. } => write!(f, "HTTP {status}"),
        }
    }
}

impl std::error::Error for TransportFailure {}
