//! Example: Fetch past trades from a private endpoint and print them.
//!
//! Run with: cargo run --example my_trades
//!
//! Reads `GEMINI_API_KEY` and `GEMINI_API_SECRET` (a `.env` file works too).
//! Set `GEMINI_SANDBOX=1` to talk to the sandbox exchange.

use std::sync::Arc;

use gemini_api_client::auth::EnvCredentials;
use gemini_api_client::rest::{Environment, GeminiRestClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let environment = match std::env::var("GEMINI_SANDBOX").ok().as_deref() {
        Some("1") => Environment::Sandbox,
        _ => Environment::Production,
    };

    let client = GeminiRestClient::builder()
        .environment(environment)
        .credentials(Arc::new(EnvCredentials::from_env()?))
        .build();

    let my_trades = client.get_my_trades().await?;
    println!("{}", serde_json::to_string_pretty(&my_trades)?);

    Ok(())
}
