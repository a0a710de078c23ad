//! Authentication module for Gemini API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Clock-based nonce generation for replay attack prevention
//! - Payload encoding and HMAC-SHA384 signature generation

mod credentials;
mod nonce;
mod payload;
mod signature;

pub use credentials::{
    API_KEY_VAR, API_SECRET_VAR, Credentials, CredentialsProvider, EnvCredentials,
    StaticCredentials,
};
pub use nonce::{Clock, IncreasingNonce, NonceProvider, SystemClock};
pub use payload::Payload;
pub use signature::{
    APIKEY_HEADER, PAYLOAD_HEADER, RequestSigner, SIGNATURE_HEADER, SignedRequest, sign_payload,
    sign_request, validate_request_path,
};
