//! # Gemini Client
//!
//! An async Rust client for the Gemini exchange private REST API.
//!
//! ## Features
//!
//! - HMAC-SHA384 request signing with byte-exact payload encoding
//! - Strictly increasing, clock-injectable nonces
//! - Secrets held in [`secrecy`] wrappers and never logged
//! - A minimal async transport with a bounded timeout
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gemini_api_client::auth::StaticCredentials;
//! use gemini_api_client::rest::GeminiRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiRestClient::builder()
//!         .credentials(Arc::new(StaticCredentials::new("api_key", "api_secret")))
//!         .build();
//!     let trades = client.get_my_trades().await?;
//!     println!("{trades}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;

// Re-export commonly used types at crate root
pub use error::GeminiError;

/// Result type alias using GeminiError
pub type Result<T> = std::result::Result<T, GeminiError>;
