//! Database models.

use chrono::{DateTime, Utc};
use pricing::{DeliveryMethod, Frequency};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Relevance threshold used when a profile has no stored preference.
pub const DEFAULT_RELEVANCE_THRESHOLD: i64 = 5;

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Opaque account identifier (UUID v4).
    pub user_id: String,
    /// Unique login email.
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    /// Set on each successful login.
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields required to open an account.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub company_name: &'a str,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unguessable session token.
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A monitoring configuration owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub business_description: String,
    /// Comma-joined topic list.
    pub topics: String,
    pub frequency: String,
    pub delivery_method: String,
    /// Monthly price snapshotted at creation.
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Topics split back into a list.
    pub fn topic_list(&self) -> Vec<String> {
        split_topics(&self.topics)
    }
}

/// Join topics into their stored form.
pub fn join_topics<S: AsRef<str>>(topics: &[S]) -> String {
    topics
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a stored or user-supplied topic string into a list.
pub fn split_topics(topics: &str) -> Vec<String> {
    topics
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fields required to create a profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: String,
    pub business_description: String,
    pub topics: Vec<String>,
    pub frequency: Frequency,
    pub delivery_method: DeliveryMethod,
    pub price: i64,
}

/// An information source attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Source {
    pub id: i64,
    pub profile_id: String,
    pub url: String,
    pub name: String,
    pub description: String,
    pub approved: bool,
    pub suggested_by_ai: bool,
    /// Zero-based position within the profile's source list.
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

/// A source as submitted by the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub approved: bool,
    #[serde(default)]
    pub suggested_by_ai: bool,
}

fn default_true() -> bool {
    true
}

/// Per-profile delivery preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub profile_id: String,
    pub relevance_threshold: i64,
    /// Comma-joined competitor URLs.
    pub competitor_urls: String,
    pub keyword_alerts: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Preference values to store. A save replaces every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPreference {
    #[serde(default = "default_threshold")]
    pub relevance_threshold: i64,
    #[serde(default)]
    pub competitor_urls: String,
    #[serde(default)]
    pub keyword_alerts: String,
}

fn default_threshold() -> i64 {
    DEFAULT_RELEVANCE_THRESHOLD
}

impl Default for NewPreference {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            competitor_urls: String::new(),
            keyword_alerts: String::new(),
        }
    }
}

/// A news or event item accepted for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Update {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub source_url: String,
    pub source_name: String,
    pub relevance_score: f64,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Outcome of an integration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    Success,
    Failed,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Success => "success",
            WebhookStatus::Failed => "failed",
        }
    }
}

/// An audit row for one inbound or outbound integration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WebhookLog {
    pub id: i64,
    pub user_id: Option<String>,
    pub webhook_type: String,
    /// Serialized JSON payload.
    pub payload: String,
    /// Serialized JSON response.
    pub response: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
