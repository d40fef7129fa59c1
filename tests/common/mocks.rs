//! Mock HTTP fixtures.

pub use crafty::adapters::mock::{MockHttpClient, MockResponse};
pub use crafty::traits::{HttpError, Response};

use bytes::Bytes;
use std::sync::Arc;

use crafty::{AgentRunClient, ClientConfig};

/// Base URL used with the mock client.
pub const MOCK_BASE: &str = "http://crafty.test";

/// Builder for a scripted MockHttpClient.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Answer `path` (relative to [`MOCK_BASE`]) with a JSON body.
    pub fn with_json_response(self, path: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            &format!("{}{}", MOCK_BASE, path),
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Answer `path` with a streamed body split into `chunks`.
    pub fn with_stream(self, path: &str, chunks: &[&str]) -> Self {
        let chunks = chunks
            .iter()
            .map(|c| Bytes::from(c.to_string()))
            .collect();
        self.client
            .set_response(&format!("{}{}", MOCK_BASE, path), MockResponse::Stream(chunks));
        self
    }

    /// Fail every request to `path` before a response arrives.
    pub fn with_error(self, path: &str, error: HttpError) -> Self {
        self.client
            .set_response(&format!("{}{}", MOCK_BASE, path), MockResponse::Error(error));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An agent client talking to `mock`.
pub fn mock_client(mock: &MockHttpClient) -> AgentRunClient {
    let config = ClientConfig::new().with_base_url(MOCK_BASE);
    AgentRunClient::with_http_client(config, Arc::new(mock.clone()))
}
