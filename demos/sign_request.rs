//! Example: Build the authentication headers for a request without sending it.
//!
//! Run with: cargo run --example sign_request

use std::sync::Arc;

use gemini_api_client::auth::{Payload, RequestSigner, StaticCredentials};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let signer = RequestSigner::new(Arc::new(StaticCredentials::new("mykey", "1234abcd")));

    let signed = signer.sign("/v1/mytrades")?;
    println!("Nonce: {}", signed.nonce);
    println!("Payload JSON: {}", Payload::decode(&signed.payload)?.to_json()?);

    for (name, value) in signed.headers()?.iter() {
        println!("{}: {}", name, value.to_str()?);
    }

    Ok(())
}
