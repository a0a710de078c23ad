use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemini_api_client::GeminiError;
use gemini_api_client::auth::{NonceProvider, Payload, StaticCredentials};
use gemini_api_client::rest::GeminiRestClient;

const FIXTURE_PAYLOAD: &str =
    "eyJyZXF1ZXN0IjogIi92MS9teXRyYWRlcyIsICJub25jZSI6ICIxNzAwMDAwMDAwMDAwIn0=";
const FIXTURE_SIGNATURE: &str = "b5b8e922eb9a122f5b77c7c0f98575d3a550e3812728585d76a7d775f6d4e36d8c6a2901476aca664460502fd867e60b";

/// Hands out consecutive nonces starting at a fixed value.
struct SequenceNonce(AtomicU64);

impl NonceProvider for SequenceNonce {
    fn next_nonce(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

fn build_client(server: &MockServer, api_key: &str, api_secret: &str) -> GeminiRestClient {
    let credentials = Arc::new(StaticCredentials::new(api_key, api_secret));
    GeminiRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials)
        .nonce_provider(Arc::new(SequenceNonce(AtomicU64::new(1_700_000_000_000))))
        .build()
}

#[tokio::test]
async fn test_get_my_trades_sends_signed_headers() {
    let server = MockServer::start().await;
    let response = serde_json::json!([{
        "price": "3648.09",
        "amount": "0.0027343246",
        "timestamp": 1547232911,
        "type": "Buy",
        "symbol": "BTCUSD",
        "tid": 107317526
    }]);

    Mock::given(method("POST"))
        .and(path("/v1/mytrades"))
        .and(header("content-type", "text/plain"))
        .and(header("cache-control", "no-cache"))
        .and(header("X-GEMINI-APIKEY", "mykey"))
        .and(header("X-GEMINI-PAYLOAD", FIXTURE_PAYLOAD))
        .and(header("X-GEMINI-SIGNATURE", FIXTURE_SIGNATURE))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    let trades = client.get_my_trades().await.unwrap();

    let trades = trades.as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["symbol"], "BTCUSD");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert_eq!(requests[0].headers["content-length"], "0");
}

#[tokio::test]
async fn test_private_post_nonce_increases_between_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    client.private_post("/v1/balances").await.unwrap();
    client.private_post("/v1/balances").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let nonces: Vec<u64> = requests
        .iter()
        .map(|req| {
            let encoded = req.headers["x-gemini-payload"].to_str().unwrap();
            let payload = Payload::decode(encoded).unwrap();
            assert_eq!(payload.request, "/v1/balances");
            payload.nonce.parse().unwrap()
        })
        .collect();

    assert_eq!(nonces, vec![1_700_000_000_000, 1_700_000_000_001]);
}

#[derive(Debug, Deserialize)]
struct Balance {
    currency: String,
    amount: String,
}

#[tokio::test]
async fn test_private_post_as_typed_response() {
    let server = MockServer::start().await;
    let response = serde_json::json!([
        {"type": "exchange", "currency": "BTC", "amount": "1154.62034001", "available": "1129.10517279"},
        {"type": "exchange", "currency": "USD", "amount": "18722.79", "available": "14481.62"}
    ]);

    Mock::given(method("POST"))
        .and(path("/v1/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    let balances: Vec<Balance> = client.private_post_as("/v1/balances").await.unwrap();

    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].currency, "BTC");
    assert_eq!(balances[1].amount, "18722.79");
}

#[tokio::test]
async fn test_api_error_is_decoded() {
    let server = MockServer::start().await;
    let response = serde_json::json!({
        "result": "error",
        "reason": "InvalidNonce",
        "message": "Nonce '1700000000000' has not increased since your last call to the Gemini API."
    });

    Mock::given(method("POST"))
        .and(path("/v1/mytrades"))
        .respond_with(ResponseTemplate::new(400).set_body_json(response))
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    match client.get_my_trades().await {
        Err(GeminiError::Api(api_error)) => {
            assert!(api_error.is_invalid_nonce());
            assert!(api_error.message.contains("has not increased"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/mytrades"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    match client.get_my_trades().await {
        Err(GeminiError::InvalidResponse(msg)) => {
            assert!(msg.contains("502"));
            assert!(msg.contains("Bad Gateway"));
        }
        other => panic!("expected invalid response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/mytrades"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    assert!(matches!(
        client.get_my_trades().await,
        Err(GeminiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_empty_credentials_make_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let empty_key = build_client(&server, "", "1234abcd");
    assert!(matches!(
        empty_key.get_my_trades().await,
        Err(GeminiError::InvalidCredential(_))
    ));

    let empty_secret = build_client(&server, "mykey", "");
    assert!(matches!(
        empty_secret.get_my_trades().await,
        Err(GeminiError::InvalidCredential(_))
    ));
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gemini/v1/mytrades"))
        .and(header("X-GEMINI-PAYLOAD", FIXTURE_PAYLOAD))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Arc::new(StaticCredentials::new("mykey", "1234abcd"));
    let client = GeminiRestClient::builder()
        .base_url(format!("{}/gemini/", server.uri()))
        .credentials(credentials)
        .nonce_provider(Arc::new(SequenceNonce(AtomicU64::new(1_700_000_000_000))))
        .build();

    let trades = client.get_my_trades().await.unwrap();
    assert!(trades.as_array().unwrap().is_empty());

    // The signed payload names the API path, not the proxy prefix.
    let requests = server.received_requests().await.unwrap();
    let encoded = requests[0].headers["x-gemini-payload"].to_str().unwrap();
    assert_eq!(Payload::decode(encoded).unwrap().request, "/v1/mytrades");
}

#[tokio::test]
async fn test_malformed_request_path_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, "mykey", "1234abcd");
    for bad in ["v1/balances", "//evil.example/v1/balances"] {
        assert!(
            matches!(
                client.private_post(bad).await,
                Err(GeminiError::InvalidRequest(_))
            ),
            "path {bad:?} should be rejected"
        );
    }

    // Rejected paths do not consume nonces.
    client.private_post("/v1/balances").await.ok();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let encoded = requests[0].headers["x-gemini-payload"].to_str().unwrap();
    assert_eq!(Payload::decode(encoded).unwrap().nonce, "1700000000000");
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/mytrades"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = GeminiRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("mykey", "1234abcd")))
        .timeout(Duration::from_millis(100))
        .build();

    assert!(matches!(
        client.get_my_trades().await,
        Err(GeminiError::Timeout)
    ));
}
