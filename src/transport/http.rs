//! # HTTP Transport
//!
//! `reqwest`-backed [`Transport`] for the Legitmark REST API and signed upload URLs.

use async_trait::async_trait;
use reqwest::{header, Client, Response, Url};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error_classifier::classify_failure;
use super::{QueryParams, Transport, TransportFailure};
use crate::config::LegitmarkConfig;
use crate::error::{LegitmarkError, Result};

/// HTTP client for the Legitmark API
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    upload_client: Client,
    base_url: Url,
    timeout_ms: u64,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from validated configuration.
    ///
    /// The API key is installed as a default `Authorization: Bearer` header. Signed
    /// upload URLs carry their own authorization and go through a second client built
    /// without it.
    pub fn new(config: &LegitmarkConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| LegitmarkError::configuration(format!("Invalid base URL: {e}")))?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", config.api_key)
                .parse()
                .map_err(|e| LegitmarkError::configuration(format!("Invalid API key: {e}")))?,
        );
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                LegitmarkError::configuration(format!("Failed to create HTTP client: {e}"))
            })?;
        let upload_client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                LegitmarkError::configuration(format!("Failed to create upload client: {e}"))
            })?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "Created Legitmark HTTP transport"
        );

        Ok(Self {
            client,
            upload_client,
            base_url,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url_for(&self, endpoint: &str) -> Result<Url> {
        self.base_url.join(endpoint).map_err(|e| {
            LegitmarkError::configuration(format!("Failed to construct URL for {endpoint}: {e}"))
                .with_endpoint(endpoint)
        })
    }

    async fn decode_json(response: Response, endpoint: &str) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(classify_failure(failure_from_response(response).await, endpoint));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_failure(failure_from_reqwest(&e), endpoint))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| LegitmarkError::from(e).with_endpoint(endpoint))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, query: &QueryParams) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        debug!(url = %url, query = ?query, "GET");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| classify_failure(failure_from_reqwest(&e), endpoint))?;

        Self::decode_json(response, endpoint).await
    }

    async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        debug!(url = %url, has_body = body.is_some(), "POST");

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| classify_failure(failure_from_reqwest(&e), endpoint))?;

        Self::decode_json(response, endpoint).await
    }

    async fn upload_bytes(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let size = bytes.len();
        let endpoint = upload_endpoint(url);
        debug!(
            endpoint = %endpoint,
            size_bytes = size,
            content_type = %content_type,
            "PUT to signed upload URL"
        );

        let response = self
            .upload_client
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| classify_failure(failure_from_reqwest(&e.without_url()), &endpoint))?;

        if response.status().is_success() {
            debug!(size_bytes = size, "Upload accepted");
            return Ok(());
        }

        let failure = failure_from_response(response).await;
        warn!(endpoint = %endpoint, status = ?failure.status_code(), "Signed upload rejected");
        Err(classify_failure(failure, &endpoint))
    }
}

/// Signed URL reduced to scheme, host and path; the query holds the signature
fn upload_endpoint(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.to_string()
        }
        Err(_) => "signed upload URL".to_string(),
    }
}

/// Convert a `reqwest` error that produced no usable response
pub(crate) fn failure_from_reqwest(error: &reqwest::Error) -> TransportFailure {
    if let Some(status) = error.status() {
        return TransportFailure::status(status.as_u16(), None);
    }
    if error.is_timeout() {
        TransportFailure::timeout(error.to_string())
    } else {
        TransportFailure::network(error.to_string())
    }
}

async fn failure_from_response(response: Response) -> TransportFailure {
    let status = response.status().as_u16();
    let headers: HashMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect();

    let body = match response.text().await {
        Ok(text) if !text.is_empty() => {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        }
        _ => None,
    };

    TransportFailure::Response {
        status,
        body,
        headers,
    }
}
