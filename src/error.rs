//! Error types for the Gemini client library.

use serde::Deserialize;
use thiserror::Error;

/// The main error type for all Gemini client operations.
#[derive(Error, Debug)]
pub enum GeminiError {
    /// API key or secret is missing or malformed
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The request itself is malformed (e.g., a bad request path)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The signed payload could not be serialized
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Gemini API returned an error
    #[error("Gemini API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Missing required credentials
    #[error("Missing credentials: API key and secret required for private endpoints")]
    MissingCredentials,
}

/// Error body returned by the Gemini API.
///
/// Gemini reports failures with a non-2xx status and a body like
/// `{"result": "error", "reason": "InvalidNonce", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Always `"error"` for failures
    #[serde(default)]
    pub result: String,
    /// Machine-readable reason (e.g., "InvalidSignature")
    pub reason: String,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

impl ApiError {
    /// Create a new API error from reason and message.
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            result: "error".to_string(),
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// Parse an API error from a response body.
    ///
    /// Returns `None` if the body is not a Gemini error object.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|e| !e.reason.is_empty())
    }

    /// Check if this is an invalid nonce error.
    pub fn is_invalid_nonce(&self) -> bool {
        self.reason == error_reasons::INVALID_NONCE
    }

    /// Check if this is an invalid signature error.
    pub fn is_invalid_signature(&self) -> bool {
        self.reason == error_reasons::INVALID_SIGNATURE
    }

    /// Check if the API key was missing or unknown.
    pub fn is_missing_key(&self) -> bool {
        matches!(
            self.reason.as_str(),
            error_reasons::MISSING_API_KEY_HEADER | error_reasons::INVALID_API_KEY
        )
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.reason == error_reasons::RATE_LIMITED
    }
}

/// Known Gemini error reasons for pattern matching.
pub mod error_reasons {
    pub const INVALID_NONCE: &str = "InvalidNonce";
    pub const INVALID_SIGNATURE: &str = "InvalidSignature";
    pub const INVALID_API_KEY: &str = "InvalidApiKey";
    pub const MISSING_API_KEY_HEADER: &str = "MissingApikeyHeader";
    pub const MISSING_PAYLOAD_HEADER: &str = "MissingPayloadHeader";
    pub const MISSING_SIGNATURE_HEADER: &str = "MissingSignatureHeader";
    pub const INVALID_JSON: &str = "InvalidJson";
    pub const INVALID_ENDPOINT: &str = "EndpointNotFound";
    pub const RATE_LIMITED: &str = "RateLimited";
    pub const SYSTEM: &str = "System";
    pub const MAINTENANCE: &str = "Maintenance";
}
