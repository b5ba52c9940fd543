#![allow(clippy::doc_markdown)] // Allow technical terms like QC, SR in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Legitmark Rust Client
//!
//! Client library for the Legitmark item-authentication API: browse the product
//! taxonomy, create service requests (SRs), upload the required photos, submit for
//! authentication, and consume the webhooks that report the outcome.
//!
//! ## Module Organization
//!
//! - [`workflow`] - Resumable six-step service request state machine
//! - [`client`] - Resource operations over a [`transport::Transport`]
//! - [`transport`] - HTTP transport and failure classification
//! - [`retry`] - Exponential-backoff retry combinator
//! - [`webhooks`] - Webhook payload validation and outcome predicates
//! - [`error`] - Unified error type with a closed set of kinds
//! - [`config`] - Configuration from defaults, files and `LEGITMARK_*` variables
//! - [`logging`] - Structured `tracing` setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use legitmark::{LegitmarkClient, LegitmarkConfig};
//!
//! # async fn example() -> legitmark::Result<()> {
//! legitmark::logging::init_structured_logging();
//!
//! let client = LegitmarkClient::new(LegitmarkConfig::from_env()?)?;
//! for category in client.get_taxonomy_tree(true).await? {
//!     println!("{} ({} types)", category.name, category.types.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`LegitmarkError`]. Branch on [`LegitmarkError::kind`] and
//! [`LegitmarkError::is_retryable`] rather than on messages.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod retry;
pub mod transport;
pub mod webhooks;
pub mod workflow;

pub use client::{LegitmarkApi, LegitmarkClient, WaitOptions};
pub use config::LegitmarkConfig;
pub use error::{ErrorContext, ErrorKind, LegitmarkError, Result, RetryableError};
pub use retry::{with_retry, RetryOptions};
pub use transport::{HttpTransport, Transport, TransportFailure};
pub use webhooks::{parse_webhook_event, WebhookEvent, WebhookValidationError};
pub use workflow::{
    ImageProvider, StepOutput, WorkflowCallbacks, WorkflowOptions, WorkflowRunner, WorkflowState,
    WorkflowStep,
};
