//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use suggest::SuggestConfig;

/// Value shipped in sample `.env` files; treated as unset.
const PLACEHOLDER_WEBHOOK_URL: &str = "your_makecom_webhook_url_here";

/// Intake web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Automation webhook receiving submitted profiles. `None` when not configured.
    pub webhook_url: Option<String>,
    /// Timeout for one webhook delivery.
    pub webhook_timeout: Duration,
    /// Lifetime of a login session.
    pub session_ttl: chrono::Duration,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// Per-client request budget.
    pub rate_limit: RateLimitConfig,
    /// AI suggestion client settings.
    pub suggest: SuggestConfig,
}

/// Per-client request budget applied to every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per client within `window`. `0` disables limiting.
    pub max_requests: u32,
    pub window: Duration,
    /// Identify clients by `X-Forwarded-For`/`X-Real-IP` instead of the peer address.
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            trust_proxy: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: "sqlite:opticon.db?mode=rwc".to_string(),
            webhook_url: None,
            webhook_timeout: Duration::from_secs(10),
            session_ttl: database::session::default_ttl(),
            cookie_secure: false,
            rate_limit: RateLimitConfig::default(),
            suggest: SuggestConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `INTAKE_ADDR` | Server bind address | `127.0.0.1:3000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:opticon.db?mode=rwc` |
    /// | `MAKECOM_WEBHOOK_URL` | Profile submission webhook | (not configured) |
    /// | `WEBHOOK_TIMEOUT_SECS` | Webhook timeout | `10` |
    /// | `SESSION_TTL_DAYS` | Session lifetime | `30` |
    /// | `COOKIE_SECURE` | Mark session cookie `Secure` | `false` |
    /// | `RATE_LIMIT_MAX` | Requests per client per window (`0` disables) | `100` |
    /// | `RATE_LIMIT_WINDOW_SECS` | Rate limit window | `900` |
    /// | `RATE_LIMIT_TRUST_PROXY` | Key clients by forwarding headers | `false` |
    ///
    /// The `PERPLEXITY_*` and `SUGGEST_TIMEOUT_SECS` variables are read by
    /// [`SuggestConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let addr = match env::var("INTAKE_ADDR") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidAddr)?,
            Err(_) => defaults.addr,
        };

        let database_url = env::var("SQLITE_PATH").unwrap_or(defaults.database_url);

        let webhook_url = env::var("MAKECOM_WEBHOOK_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && url != PLACEHOLDER_WEBHOOK_URL);

        let webhook_timeout = match env::var("WEBHOOK_TIMEOUT_SECS") {
            Ok(value) => Duration::from_secs(parse_number("WEBHOOK_TIMEOUT_SECS", &value)?),
            Err(_) => defaults.webhook_timeout,
        };

        let session_ttl = match env::var("SESSION_TTL_DAYS") {
            Ok(value) => {
                let days = parse_number("SESSION_TTL_DAYS", &value)?;
                if days == 0 {
                    return Err(ConfigError::InvalidNumber("SESSION_TTL_DAYS"));
                }
                chrono::Duration::days(days as i64)
            }
            Err(_) => defaults.session_ttl,
        };

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(value) => parse_bool("COOKIE_SECURE", &value)?,
            Err(_) => defaults.cookie_secure,
        };

        let rate_limit = rate_limit_from_env(defaults.rate_limit)?;

        Ok(Self {
            addr,
            database_url,
            webhook_url,
            webhook_timeout,
            session_ttl,
            cookie_secure,
            rate_limit,
            suggest: SuggestConfig::from_env(),
        })
    }
}

fn rate_limit_from_env(defaults: RateLimitConfig) -> Result<RateLimitConfig, ConfigError> {
    let max_requests = match env::var("RATE_LIMIT_MAX") {
        Ok(value) => u32::try_from(parse_number("RATE_LIMIT_MAX", &value)?)
            .map_err(|_| ConfigError::InvalidNumber("RATE_LIMIT_MAX"))?,
        Err(_) => defaults.max_requests,
    };

    let window = match env::var("RATE_LIMIT_WINDOW_SECS") {
        Ok(value) => {
            let secs = parse_number("RATE_LIMIT_WINDOW_SECS", &value)?;
            if secs == 0 {
                return Err(ConfigError::InvalidNumber("RATE_LIMIT_WINDOW_SECS"));
            }
            Duration::from_secs(secs)
        }
        Err(_) => defaults.window,
    };

    let trust_proxy = match env::var("RATE_LIMIT_TRUST_PROXY") {
        Ok(value) => parse_bool("RATE_LIMIT_TRUST_PROXY", &value)?,
        Err(_) => defaults.trust_proxy,
    };

    Ok(RateLimitConfig {
        max_requests,
        window,
        trust_proxy,
    })
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(var))
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool(var)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid INTAKE_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a positive whole number")]
    InvalidNumber(&'static str),

    #[error("{0} must be true or false")]
    InvalidBool(&'static str),
}
