//! # Retry Executor
//!
//! Generic "retry an async operation with exponential backoff" combinator. Waiting is
//! a `tokio::time::sleep`, so other tasks on the runtime keep running between
//! attempts.
//!
//! ```rust
//! use legitmark::retry::{with_retry, RetryOptions};
//! use legitmark::{ErrorKind, LegitmarkError};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let options = RetryOptions::<LegitmarkError>::default()
//!     .with_initial_delay(Duration::from_millis(1));
//! let mut calls = 0;
//! let value = with_retry(
//!     || {
//!         calls += 1;
//!         let attempt = calls;
//!         async move {
//!             if attempt < 2 {
//!                 Err(LegitmarkError::new(ErrorKind::ServerError, "flaky"))
//!             } else {
//!                 Ok(attempt)
//!             }
//!         }
//!     },
//!     &options,
//! )
//! .await
//! .unwrap();
//! assert_eq!(value, 2);
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::RetryableError;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;
type RetryHook<E> = Arc<dyn Fn(&E, u32) + Send + Sync>;

/// Retry configuration
pub struct RetryOptions<E> {
    /// Total attempts including the first (minimum 1)
    pub attempts: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Double the wait after every retry
    pub exponential_backoff: bool,
    should_retry: RetryPredicate<E>,
    on_retry: Option<RetryHook<E>>,
}

impl<E> Clone for RetryOptions<E> {
    fn clone(&self) -> Self {
        Self {
            attempts: self.attempts,
            initial_delay: self.initial_delay,
            exponential_backoff: self.exponential_backoff,
            should_retry: Arc::clone(&self.should_retry),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("attempts", &self.attempts)
            .field("initial_delay", &self.initial_delay)
            .field("exponential_backoff", &self.exponential_backoff)
            .field("has_on_retry", &self.on_retry.is_some())
            .finish()
    }
}

impl<E: RetryableError + 'static> Default for RetryOptions<E> {
    fn default() -> Self {
        Self::with_predicate(|error: &E| error.should_retry())
    }
}

impl<E> RetryOptions<E> {
    /// Default attempts and delays with a custom retry predicate
    pub fn with_predicate<P>(predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            exponential_backoff: true,
            should_retry: Arc::new(predicate),
            on_retry: None,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Called with the failed attempt's error and its 1-based number before waiting
    pub fn with_on_retry<H>(mut self, hook: H) -> Self
    where
        H: Fn(&E, u32) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Wait after the failed `attempt` (1-based): `initial_delay * 2^(attempt-1)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if !self.exponential_backoff {
            return self.initial_delay;
        }
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_delay.saturating_mul(1u32 << exponent)
    }

    pub fn should_retry(&self, error: &E) -> bool {
        (self.should_retry)(error)
    }
}

/// Run `operation` until it succeeds, the predicate rejects its error, or attempts are
/// exhausted. The last error is returned unchanged.
pub async fn with_retry<T, E, F, Fut>(mut operation: F, options: &RetryOptions<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let attempts = options.attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if attempt >= attempts || !options.should_retry(&error) {
                    return Err(error);
                }

                if let Some(hook) = &options.on_retry {
                    hook(&error, attempt);
                }

                let delay = options.delay_for_attempt(attempt);
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Retrying after failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
