//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod builders;
pub mod mock_transport;
pub mod recorders;
pub mod strategies;

use std::sync::Arc;

use legitmark::LegitmarkClient;
use mock_transport::MockTransport;

/// Client over a fresh mock; reads are not retried
pub fn mock_client() -> (LegitmarkClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = LegitmarkClient::with_transport(transport.clone()).with_read_attempts(1);
    (client, transport)
}
