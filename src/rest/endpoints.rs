//! Gemini REST API endpoint constants.

/// Base URL for the Gemini production REST API.
pub const GEMINI_BASE_URL: &str = "https://api.gemini.com";

/// Base URL for the Gemini sandbox REST API.
pub const GEMINI_SANDBOX_URL: &str = "https://api.sandbox.gemini.com";

/// Which Gemini deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Live trading.
    #[default]
    Production,
    /// Gemini's test exchange.
    Sandbox,
}

impl Environment {
    /// The REST base URL for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => GEMINI_BASE_URL,
            Environment::Sandbox => GEMINI_SANDBOX_URL,
        }
    }
}

/// Private endpoints (authentication required).
pub mod private {
    /// Get past trades.
    pub const MY_TRADES: &str = "/v1/mytrades";
}
