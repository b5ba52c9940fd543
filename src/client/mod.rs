//! # Legitmark API Client
//!
//! Thin resource wrappers over a [`Transport`]. [`LegitmarkApi`] is the seam the
//! workflow runner depends on; [`LegitmarkClient`] is the production implementation.
//!
//! ```rust,no_run
//! use legitmark::{LegitmarkClient, LegitmarkConfig};
//!
//! # async fn example() -> legitmark::Result<()> {
//! let client = LegitmarkClient::new(LegitmarkConfig::from_env()?)?;
//! let categories = client.get_taxonomy_tree(true).await?;
//! println!("{} categories", categories.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::LegitmarkConfig;
use crate::error::{LegitmarkError, Result};
use crate::models::{
    Category, CreateServiceRequest, ImageData, IncludeOptions, ProgressData, ServiceRequest,
};
use crate::retry::{with_retry, RetryOptions};
use crate::transport::{HttpTransport, Transport};

mod images;
mod service_requests;
mod taxonomy;

pub use service_requests::WaitOptions;

/// Resource operations the workflow runner consumes
#[async_trait]
pub trait LegitmarkApi: Send + Sync {
    async fn get_taxonomy_tree(&self, active_only: bool) -> Result<Vec<Category>>;

    async fn create_service_request(&self, request: &CreateServiceRequest)
        -> Result<ServiceRequest>;

    async fn get_service_request(
        &self,
        sr_uuid: Uuid,
        include: IncludeOptions,
    ) -> Result<ServiceRequest>;

    async fn get_progress(&self, sr_uuid: Uuid) -> Result<ProgressData>;

    async fn upload_image(&self, sr_uuid: Uuid, side_uuid: Uuid, image: ImageData) -> Result<()>;

    async fn submit_service_request(&self, sr_uuid: Uuid) -> Result<ServiceRequest>;
}

/// Production client over any [`Transport`]
#[derive(Clone)]
pub struct LegitmarkClient {
    transport: Arc<dyn Transport>,
    read_retry: RetryOptions<LegitmarkError>,
}

impl std::fmt::Debug for LegitmarkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegitmarkClient")
            .field("read_retry", &self.read_retry)
            .finish()
    }
}

impl LegitmarkClient {
    /// Build a client with the `reqwest` transport
    pub fn new(config: LegitmarkConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport)).with_read_attempts(config.max_retries))
    }

    /// Build a client over a caller-supplied transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            read_retry: RetryOptions::default(),
        }
    }

    /// Attempts for idempotent reads (1 disables retrying)
    pub fn with_read_attempts(mut self, attempts: u32) -> Self {
        self.read_retry = self.read_retry.with_attempts(attempts);
        self
    }

    pub fn with_read_retry_delay(mut self, delay: Duration) -> Self {
        self.read_retry = self.read_retry.with_initial_delay(delay);
        self
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Run an idempotent read through the retry executor
    async fn read<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        with_retry(operation, &self.read_retry).await
    }
}

/// Unwrap `body[key]` (or the body itself when the key is absent) into `T`
pub(crate) fn decode_entity<T: DeserializeOwned>(
    mut body: Value,
    key: &str,
    endpoint: &str,
) -> Result<T> {
    let entity = if body.get(key).is_some() {
        body[key].take()
    } else {
        body
    };
    serde_json::from_value(entity).map_err(|e| LegitmarkError::from(e).with_endpoint(endpoint))
}

#[async_trait]
impl LegitmarkApi for LegitmarkClient {
    async fn get_taxonomy_tree(&self, active_only: bool) -> Result<Vec<Category>> {
        LegitmarkClient::get_taxonomy_tree(self, active_only).await
    }

    async fn create_service_request(
        &self,
        request: &CreateServiceRequest,
    ) -> Result<ServiceRequest> {
        LegitmarkClient::create_service_request(self, request).await
    }

    async fn get_service_request(
        &self,
        sr_uuid: Uuid,
        include: IncludeOptions,
    ) -> Result<ServiceRequest> {
        LegitmarkClient::get_service_request(self, sr_uuid, include).await
    }

    async fn get_progress(&self, sr_uuid: Uuid) -> Result<ProgressData> {
        LegitmarkClient::get_progress(self, sr_uuid).await
    }

    async fn upload_image(&self, sr_uuid: Uuid, side_uuid: Uuid, image: ImageData) -> Result<()> {
        LegitmarkClient::upload_image(self, sr_uuid, side_uuid, image).await
    }

    async fn submit_service_request(&self, sr_uuid: Uuid) -> Result<ServiceRequest> {
        LegitmarkClient::submit_service_request(self, sr_uuid).await
    }
}
