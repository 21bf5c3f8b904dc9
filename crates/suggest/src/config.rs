//! Configuration for the completion client.

use std::env;
use std::time::Duration;

/// Default chat completion endpoint.
pub const DEFAULT_API_URL: &str = "https://api.perplexity.ai/chat/completions";

/// Default online model.
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Value shipped in sample `.env` files; treated as unset.
const PLACEHOLDER_KEY: &str = "your_perplexity_api_key_here";

/// Configuration for [`crate::PerplexityClient`].
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Chat completion endpoint.
    pub api_url: String,

    /// Bearer token. `None` disables remote calls.
    pub api_key: Option<String>,

    /// Model name to use.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens for a completion.
    pub max_tokens: u32,

    /// Upper bound on one request, including the response body.
    pub timeout: Duration,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SuggestConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `PERPLEXITY_API_KEY` - API key (unset or placeholder disables remote calls)
    /// - `PERPLEXITY_API_URL` - endpoint (default: Perplexity chat completions)
    /// - `PERPLEXITY_MODEL` - model name
    /// - `SUGGEST_TIMEOUT_SECS` - request timeout (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("PERPLEXITY_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_KEY);

        let api_url = env::var("PERPLEXITY_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("PERPLEXITY_MODEL").unwrap_or(defaults.model);

        let timeout = env::var("SUGGEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_url,
            api_key,
            model,
            timeout,
            ..defaults
        }
    }

    /// Whether remote suggestions can be requested.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
