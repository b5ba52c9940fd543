//! In-memory [`Transport`] for driving the client and workflow without a network.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

use legitmark::error::{ErrorKind, LegitmarkError, Result};
use legitmark::transport::{QueryParams, Transport};

/// One request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub endpoint: String,
    pub query: QueryParams,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Fail(LegitmarkError),
}

/// Replies are queued per `(method, endpoint)`. The last queued reply repeats, so a
/// single stub covers any number of calls.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
    upload_failure: Mutex<Option<LegitmarkError>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: &'static str, endpoint: &str, reply: Reply) {
        self.routes
            .lock()
            .entry((method, endpoint.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn on_get(&self, endpoint: &str, body: Value) -> &Self {
        self.push("GET", endpoint, Reply::Json(body));
        self
    }

    pub fn on_post(&self, endpoint: &str, body: Value) -> &Self {
        self.push("POST", endpoint, Reply::Json(body));
        self
    }

    pub fn fail_get(&self, endpoint: &str, error: LegitmarkError) -> &Self {
        self.push("GET", endpoint, Reply::Fail(error));
        self
    }

    pub fn fail_post(&self, endpoint: &str, error: LegitmarkError) -> &Self {
        self.push("POST", endpoint, Reply::Fail(error));
        self
    }

    pub fn fail_uploads(&self, error: LegitmarkError) {
        *self.upload_failure.lock() = Some(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: &str, endpoint: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method && call.endpoint == endpoint)
            .count()
    }

    /// Signed URLs that received bytes, in order
    pub fn uploaded_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == "PUT")
            .map(|call| call.endpoint.clone())
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().push(call);
    }

    fn reply(&self, method: &'static str, endpoint: &str) -> Result<Value> {
        let mut routes = self.routes.lock();
        let reply = match routes.get_mut(&(method, endpoint.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Fail(error)) => Err(error),
            None => Err(LegitmarkError::new(
                ErrorKind::NotFoundError,
                format!("No mock route for {method} {endpoint}"),
            )
            .with_endpoint(endpoint)),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, endpoint: &str, query: &QueryParams) -> Result<Value> {
        self.record(RecordedCall {
            method: "GET",
            endpoint: endpoint.to_string(),
            query: query.clone(),
            body: None,
        });
        self.reply("GET", endpoint)
    }

    async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        self.record(RecordedCall {
            method: "POST",
            endpoint: endpoint.to_string(),
            query: Vec::new(),
            body: body.cloned(),
        });
        self.reply("POST", endpoint)
    }

    async fn upload_bytes(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.record(RecordedCall {
            method: "PUT",
            endpoint: url.to_string(),
            query: vec![
                ("content_type".to_string(), content_type.to_string()),
                ("size".to_string(), bytes.len().to_string()),
            ],
            body: None,
        });
        match self.upload_failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
