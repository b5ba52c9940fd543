use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::{decode_entity, LegitmarkClient};
use crate::constants::{endpoints, response_keys};
use crate::error::{ErrorKind, LegitmarkError, Result};
use crate::models::{CreateServiceRequest, IncludeOptions, ProgressData, ServiceRequest};

/// Bounds for [`LegitmarkClient::wait_for_requirements`], separate from the
/// per-call transport timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time to keep polling
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl LegitmarkClient {
    /// Create a service request
    ///
    /// POST /api/v2/sr
    pub async fn create_service_request(
        &self,
        request: &CreateServiceRequest,
    ) -> Result<ServiceRequest> {
        let body = serde_json::to_value(request)?;
        let response = self
            .transport
            .post(endpoints::SERVICE_REQUESTS, Some(&body))
            .await?;
        let sr: ServiceRequest =
            decode_entity(response, response_keys::SERVICE_REQUEST, endpoints::SERVICE_REQUESTS)?;

        info!(
            sr_uuid = %sr.uuid,
            external_id = ?request.external_id,
            state = %sr.state,
            "Created service request"
        );
        Ok(sr)
    }

    /// Fetch a service request with the requested related data
    ///
    /// GET /api/v2/sr/{sr_uuid}?include=...
    pub async fn get_service_request(
        &self,
        sr_uuid: Uuid,
        include: IncludeOptions,
    ) -> Result<ServiceRequest> {
        let endpoint = endpoints::service_request(sr_uuid);
        let query = include.to_query();

        let body = self.read(|| self.transport.get(&endpoint, &query)).await?;
        let sr: ServiceRequest = decode_entity(body, response_keys::SERVICE_REQUEST, &endpoint)?;

        debug!(
            sr_uuid = %sr_uuid,
            state = %sr.state,
            sides = sr.side_count(),
            "Fetched service request"
        );
        Ok(sr)
    }

    /// Upload progress, derived from the sides listing
    pub async fn get_progress(&self, sr_uuid: Uuid) -> Result<ProgressData> {
        let sr = self
            .get_service_request(sr_uuid, IncludeOptions::sides_only())
            .await?;
        let progress = ProgressData::from_sides(sr.sides.as_deref().unwrap_or_default());

        debug!(
            sr_uuid = %sr_uuid,
            current_required = progress.current_required,
            total_required = progress.total_required,
            met = progress.met,
            "Computed upload progress"
        );
        Ok(progress)
    }

    /// Submit a service request for authentication
    ///
    /// POST /api/v2/sr/{sr_uuid}/submit
    pub async fn submit_service_request(&self, sr_uuid: Uuid) -> Result<ServiceRequest> {
        let endpoint = endpoints::submit(sr_uuid);
        let response = self.transport.post(&endpoint, None).await?;
        let sr: ServiceRequest = decode_entity(response, response_keys::SERVICE_REQUEST, &endpoint)?;

        info!(sr_uuid = %sr_uuid, state = %sr.state, "Submitted service request");
        Ok(sr)
    }

    /// Poll until the backend has attached photo requirements to a fresh request.
    ///
    /// Fails with a retryable `TIMEOUT_ERROR` once `options.timeout` has elapsed.
    pub async fn wait_for_requirements(
        &self,
        sr_uuid: Uuid,
        options: WaitOptions,
    ) -> Result<ServiceRequest> {
        let include = IncludeOptions {
            requirements: true,
            sides: true,
            item: false,
        };
        let started = tokio::time::Instant::now();
        let mut polls = 0u32;

        loop {
            polls += 1;
            let sr = self.get_service_request(sr_uuid, include).await?;
            let has_requirements = sr.side_count() > 0
                || sr
                    .requirements
                    .as_ref()
                    .is_some_and(|r| !r.side_groups.is_empty());
            if has_requirements {
                debug!(sr_uuid = %sr_uuid, polls, "Requirements available");
                return Ok(sr);
            }

            if started.elapsed() + options.poll_interval > options.timeout {
                return Err(LegitmarkError::new(
                    ErrorKind::TimeoutError,
                    format!(
                        "Requirements for {sr_uuid} not available after {}ms",
                        options.timeout.as_millis()
                    ),
                )
                .with_endpoint(endpoints::service_request(sr_uuid))
                .with_detail("polls", serde_json::json!(polls))
                .with_suggestion("Retry later or increase the wait timeout"));
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }
}
