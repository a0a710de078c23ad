//! HMAC-SHA384 request signing for Gemini API authentication.
//!
//! Gemini private endpoints take no request body. Instead the request is
//! described by a base64 JSON payload and authenticated with:
//! ```text
//! hex(HMAC-SHA384(base64(json({"request": path, "nonce": "<nonce>"})), api_secret))
//! ```
//!
//! The key, payload and signature travel in `X-GEMINI-*` headers.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use reqwest::header::{
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};
use sha2::Sha384;

use crate::auth::{Credentials, CredentialsProvider, IncreasingNonce, NonceProvider, Payload};
use crate::error::GeminiError;

type HmacSha384 = Hmac<Sha384>;

/// Header carrying the API key.
pub const APIKEY_HEADER: &str = "x-gemini-apikey";
/// Header carrying the base64 payload.
pub const PAYLOAD_HEADER: &str = "x-gemini-payload";
/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-gemini-signature";

/// Compute the hex-encoded HMAC-SHA384 of an encoded payload.
///
/// The secret is used as raw bytes, not decoded.
pub fn sign_payload(credentials: &Credentials, payload: &str) -> Result<String, GeminiError> {
    let mut hmac = HmacSha384::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| GeminiError::InvalidCredential(format!("Invalid HMAC key: {e}")))?;
    hmac.update(payload.as_bytes());
    Ok(hex::encode(hmac.finalize().into_bytes()))
}

/// Check that `request_path` is an absolute path on the API host.
///
/// The path is embedded in the signed payload and appended verbatim to the
/// base URL, so it must start with exactly one `/`.
pub fn validate_request_path(request_path: &str) -> Result<(), GeminiError> {
    if !request_path.starts_with('/') || request_path.starts_with("//") {
        return Err(GeminiError::InvalidRequest(format!(
            "Request path must start with a single '/': {request_path:?}"
        )));
    }
    if request_path.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(GeminiError::InvalidRequest(format!(
            "Request path must not contain whitespace: {request_path:?}"
        )));
    }
    Ok(())
}

/// Sign a request for Gemini's private API.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the key and secret
/// * `request_path` - The API endpoint path (e.g., "/v1/mytrades")
/// * `nonce` - The nonce value for this request
///
/// # Example
///
/// ```rust
/// use gemini_api_client::auth::{Credentials, sign_request};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("mykey", "1234abcd");
/// let signed = sign_request(&credentials, "/v1/mytrades", 1700000000000)?;
/// assert_eq!(signed.signature.len(), 96);
/// let headers = signed.headers()?;
/// assert_eq!(headers["content-length"], "0");
/// # Ok(())
/// # }
/// ```
pub fn sign_request(
    credentials: &Credentials,
    request_path: &str,
    nonce: u64,
) -> Result<SignedRequest, GeminiError> {
    credentials.validate()?;
    validate_request_path(request_path)?;

    let payload = Payload::new(request_path, nonce).encode()?;
    let signature = sign_payload(credentials, &payload)?;

    Ok(SignedRequest {
        api_key: credentials.api_key.clone(),
        nonce,
        request_path: request_path.to_string(),
        payload,
        signature,
    })
}

/// The artifacts of one signed request.
///
/// Each value is built for a single call; the nonce must not be replayed.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// The API key sent in `X-GEMINI-APIKEY`
    pub api_key: String,
    /// The nonce embedded in the payload
    pub nonce: u64,
    /// The endpoint path embedded in the payload
    pub request_path: String,
    /// Base64 JSON payload
    pub payload: String,
    /// Lowercase hex HMAC-SHA384 of `payload`
    pub signature: String,
}

impl SignedRequest {
    /// Build the header map for a POST with an empty body.
    ///
    /// Fails with [`GeminiError::InvalidCredential`] if the API key contains
    /// characters that are not allowed in a header value.
    pub fn headers(&self) -> Result<HeaderMap, GeminiError> {
        let api_key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            GeminiError::InvalidCredential("API key is not a valid header value.".to_string())
        })?;
        let payload = HeaderValue::from_str(&self.payload)
            .map_err(|e| GeminiError::Encoding(format!("Invalid payload header: {e}")))?;
        let signature = HeaderValue::from_str(&self.signature)
            .map_err(|e| GeminiError::Encoding(format!("Invalid signature header: {e}")))?;

        let mut headers = HeaderMap::with_capacity(6);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        headers.insert(HeaderName::from_static(APIKEY_HEADER), api_key);
        headers.insert(HeaderName::from_static(PAYLOAD_HEADER), payload);
        headers.insert(HeaderName::from_static(SIGNATURE_HEADER), signature);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        Ok(headers)
    }
}

impl std::fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedRequest")
            .field("api_key", &self.api_key)
            .field("nonce", &self.nonce)
            .field("request_path", &self.request_path)
            .finish_non_exhaustive()
    }
}

/// Signs request paths with a credentials provider and a shared nonce source.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use gemini_api_client::auth::{RequestSigner, StaticCredentials};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = RequestSigner::new(Arc::new(StaticCredentials::new("mykey", "1234abcd")));
/// let first = signer.sign("/v1/mytrades")?;
/// let second = signer.sign("/v1/mytrades")?;
/// assert!(second.nonce > first.nonce);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestSigner {
    credentials: Arc<dyn CredentialsProvider>,
    nonce_provider: Arc<dyn NonceProvider>,
}

impl RequestSigner {
    /// Create a signer using a time-based [`IncreasingNonce`].
    pub fn new(credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self::with_nonce_provider(credentials, Arc::new(IncreasingNonce::new()))
    }

    /// Create a signer with a custom nonce provider.
    pub fn with_nonce_provider(
        credentials: Arc<dyn CredentialsProvider>,
        nonce_provider: Arc<dyn NonceProvider>,
    ) -> Self {
        Self {
            credentials,
            nonce_provider,
        }
    }

    /// Sign `request_path` with the next nonce.
    ///
    /// Credentials and the path are checked before a nonce is drawn, so a
    /// rejected call does not consume one.
    pub fn sign(&self, request_path: &str) -> Result<SignedRequest, GeminiError> {
        let credentials = self.credentials.get_credentials();
        credentials.validate()?;
        validate_request_path(request_path)?;

        let nonce = self.nonce_provider.next_nonce();
        tracing::debug!(request_path, nonce, "signing Gemini request");
        sign_request(credentials, request_path, nonce)
    }

    /// Sign `request_path` and return the header map directly.
    pub fn sign_headers(&self, request_path: &str) -> Result<HeaderMap, GeminiError> {
        self.sign(request_path)?.headers()
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key", &self.credentials.get_credentials().api_key)
            .finish_non_exhaustive()
    }
}
