//! Gemini REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{
    CredentialsProvider, IncreasingNonce, NonceProvider, RequestSigner, validate_request_path,
};
use crate::error::{ApiError, GeminiError};
use crate::rest::endpoints::{Environment, private};

/// Default bound on a single HTTP round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The Gemini private REST API client.
///
/// Every call draws a fresh nonce, signs the request path and sends a POST
/// with an empty body. Requests are not retried.
///
/// # Example
///
/// ```rust,no_run
/// use gemini_api_client::auth::EnvCredentials;
/// use gemini_api_client::rest::GeminiRestClient;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(EnvCredentials::from_env()?);
///     let client = GeminiRestClient::builder()
///         .credentials(credentials)
///         .build();
///
///     let trades = client.get_my_trades().await?;
///     println!("{trades:#}");
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GeminiRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    signer: Option<RequestSigner>,
}

impl GeminiRestClient {
    /// Create a new client builder.
    pub fn builder() -> GeminiRestClientBuilder {
        GeminiRestClientBuilder::new()
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the account's past trades (`/v1/mytrades`).
    pub async fn get_my_trades(&self) -> Result<serde_json::Value, GeminiError> {
        self.private_post(private::MY_TRADES).await
    }

    /// Make an authenticated POST and return the raw JSON response.
    pub async fn private_post(&self, request_path: &str) -> Result<serde_json::Value, GeminiError> {
        self.private_post_as(request_path).await
    }

    /// Make an authenticated POST and deserialize the response into `T`.
    pub async fn private_post_as<T>(&self, request_path: &str) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
    {
        let signer = self.signer.as_ref().ok_or(GeminiError::MissingCredentials)?;

        validate_request_path(request_path)?;
        let url = self.request_url(request_path)?;

        // Sign last so a rejected request never consumes a nonce.
        let headers = signer.sign_headers(request_path)?;

        tracing::debug!(%url, "sending Gemini private request");
        let response = self
            .http_client
            .post(url)
            .headers(headers)
            .send()
            .await
            .map_err(map_send_error)?;

        self.parse_response(response).await
    }

    /// Append `request_path` to the base URL, keeping any base path prefix.
    fn request_url(&self, request_path: &str) -> Result<Url, GeminiError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request_path);
        Ok(Url::parse(&url)?)
    }

    /// Parse a response from the Gemini API.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GeminiError::Timeout
            } else {
                GeminiError::Http(e)
            }
        })?;
        tracing::debug!(%status, bytes = body.len(), "received Gemini response");

        if !status.is_success() {
            tracing::warn!(%status, "Gemini request failed");
            return Err(match ApiError::from_body(&body) {
                Some(api_error) => GeminiError::Api(api_error),
                None => GeminiError::InvalidResponse(format!("HTTP {}: {}", status, body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            GeminiError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }
}

fn map_send_error(err: reqwest_middleware::Error) -> GeminiError {
    match err {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => GeminiError::Timeout,
        reqwest_middleware::Error::Reqwest(e) => GeminiError::Http(e),
        other => GeminiError::HttpMiddleware(other),
    }
}

impl Default for GeminiRestClient {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for GeminiRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.signer.is_some())
            .finish()
    }
}

/// Builder for [`GeminiRestClient`].
pub struct GeminiRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
}

impl GeminiRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Environment::Production.base_url().to_string(),
            credentials: None,
            nonce_provider: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Point the client at production or the sandbox.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.base_url = environment.base_url().to_string();
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    ///
    /// Share one provider between clients using the same API key.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the timeout for each HTTP request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> GeminiRestClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("gemini-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("gemini-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let signer = self.credentials.map(|credentials| {
            let nonce_provider = self
                .nonce_provider
                .unwrap_or_else(|| Arc::new(IncreasingNonce::new()));
            RequestSigner::with_nonce_provider(credentials, nonce_provider)
        });

        GeminiRestClient {
            http_client: client,
            base_url: self.base_url,
            signer,
        }
    }
}

impl Default for GeminiRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
