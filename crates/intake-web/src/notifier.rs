//! Outbound profile-submission webhook.

use std::time::Duration;

use database::{webhook_log, Database, WebhookStatus};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// A source as forwarded to the automation platform.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookSource {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// Body posted to the automation platform after a profile is saved.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSubmission {
    pub user_id: String,
    pub profile_id: String,
    pub business_description: String,
    pub topics: Vec<String>,
    pub frequency: String,
    pub delivery_method: String,
    pub price: i64,
    pub approved_sources: Vec<WebhookSource>,
    pub preferences: Value,
    pub timestamp: String,
}

/// Delivers profile submissions and records each attempt in the webhook log.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
}

impl WebhookNotifier {
    /// Create a notifier. A `None` url disables delivery.
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Post one submission. `Ok` holds the recorded response, `Err` the failure.
    pub async fn deliver(&self, submission: &ProfileSubmission) -> Result<Value, Value> {
        let Some(url) = self.url.as_deref() else {
            info!("Webhook not configured, skipping delivery");
            return Ok(json!({
                "status": "not_configured",
                "message": "Webhook URL not set",
            }));
        };

        let response = self
            .client
            .post(url)
            .json(submission)
            .send()
            .await
            .map_err(|e| json!({ "status": "error", "error": e.to_string() }))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let data = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if status.is_success() {
            Ok(json!({ "status": "success", "statusCode": status.as_u16(), "data": data }))
        } else {
            Err(json!({ "status": "error", "statusCode": status.as_u16(), "error": data }))
        }
    }

    /// Deliver on a background task and log the outcome.
    ///
    /// The returned handle is only useful to tests; request handlers drop it.
    pub fn spawn_delivery(
        &self,
        db: Database,
        submission: ProfileSubmission,
    ) -> tokio::task::JoinHandle<()> {
        let notifier = self.clone();

        tokio::spawn(async move {
            let (response, status) = match notifier.deliver(&submission).await {
                Ok(response) => (response, WebhookStatus::Success),
                Err(response) => {
                    warn!(
                        profile_id = %submission.profile_id,
                        "Profile webhook delivery failed: {}", response
                    );
                    (response, WebhookStatus::Failed)
                }
            };

            let payload = match serde_json::to_value(&submission) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to encode webhook payload for log: {}", e);
                    Value::Null
                }
            };

            if let Err(e) = webhook_log::log_webhook(
                db.pool(),
                Some(&submission.user_id),
                webhook_log::PROFILE_SUBMISSION,
                &payload,
                &response,
                status,
            )
            .await
            {
                error!("Failed to record webhook log: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ProfileSubmission {
        ProfileSubmission {
            user_id: "u1".to_string(),
            profile_id: "p1".to_string(),
            business_description: "Bakery".to_string(),
            topics: vec!["flour prices".to_string()],
            frequency: "weekly".to_string(),
            delivery_method: "email".to_string(),
            price: 20,
            approved_sources: vec![],
            preferences: json!({}),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_delivery_reports_not_configured() {
        let notifier = WebhookNotifier::new(None, Duration::from_secs(1)).unwrap();
        assert!(!notifier.is_configured());

        let response = notifier.deliver(&submission()).await.unwrap();
        assert_eq!(response["status"], "not_configured");
    }

    #[tokio::test]
    async fn test_unreachable_webhook_fails() {
        let notifier = WebhookNotifier::new(
            Some("http://127.0.0.1:9/hook".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();

        let response = notifier.deliver(&submission()).await.unwrap_err();
        assert_eq!(response["status"], "error");
    }

    #[tokio::test]
    async fn test_spawned_delivery_is_logged() {
        let db = Database::in_memory().await.unwrap();
        let notifier = WebhookNotifier::new(None, Duration::from_secs(1)).unwrap();

        notifier
            .spawn_delivery(db.clone(), submission())
            .await
            .unwrap();

        let logs = webhook_log::list_recent(db.pool(), 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].webhook_type, "profile_submission");
        assert_eq!(logs[0].status, "success");
        assert!(logs[0].response.contains("not_configured"));
    }
}
