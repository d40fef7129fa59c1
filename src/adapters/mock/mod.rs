//! Mock implementations for testing without a network.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
