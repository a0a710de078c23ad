//! Gemini private REST API client.
//!
//! [`GeminiRestClient`] signs a request path, POSTs it with an empty body and
//! hands back the JSON response. Response bodies are returned as
//! [`serde_json::Value`] unless the caller asks for a concrete type.

mod client;
mod endpoints;

pub use client::{DEFAULT_TIMEOUT, GeminiRestClient, GeminiRestClientBuilder};
pub use endpoints::*;
