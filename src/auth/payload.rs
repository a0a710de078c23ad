//! The JSON payload carried in the `X-GEMINI-PAYLOAD` header.
//!
//! The payload is serialized with `": "` and `", "` separators and a fixed
//! key order (`request`, then `nonce`), then base64-encoded. The encoded
//! bytes are both transmitted and used as the HMAC input.

use std::io;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::error::GeminiError;

/// The signed request body.
///
/// Field order is significant: it is the key order of the serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// The API path being called (e.g., "/v1/mytrades")
    pub request: String,
    /// The nonce, serialized as a decimal string
    pub nonce: String,
}

impl Payload {
    /// Create a payload for the given request path and nonce.
    pub fn new(request: impl Into<String>, nonce: u64) -> Self {
        Self {
            request: request.into(),
            nonce: nonce.to_string(),
        }
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> Result<String, GeminiError> {
        let mut buf = Vec::with_capacity(64);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)
            .map_err(|e| GeminiError::Encoding(format!("Failed to serialize payload: {e}")))?;
        String::from_utf8(buf)
            .map_err(|e| GeminiError::Encoding(format!("Payload is not valid UTF-8: {e}")))
    }

    /// Serialize to JSON and base64-encode.
    pub fn encode(&self) -> Result<String, GeminiError> {
        Ok(BASE64.encode(self.to_json()?))
    }

    /// Decode a base64 payload header value back into a [`Payload`].
    pub fn decode(encoded: &str) -> Result<Self, GeminiError> {
        let json = BASE64
            .decode(encoded)
            .map_err(|e| GeminiError::Encoding(format!("Payload is not valid base64: {e}")))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

/// JSON formatter that puts a space after `:` and `,`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
