//! Inbound update ingestion with relevance filtering.
//!
//! Each incoming item is kept only if its relevance score meets the governing
//! threshold. Dropped items leave no trace; the batch as a whole gets one
//! audit row.
//!
//! The governing threshold is chosen as follows:
//! - if the batch names a profile, that profile's threshold (it must belong
//!   to the account);
//! - otherwise the strictest threshold across all of the account's profiles;
//! - a profile without stored preferences counts as
//!   [`DEFAULT_RELEVANCE_THRESHOLD`], as does an account with no profiles.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DatabaseError, Result};
use crate::models::{WebhookStatus, DEFAULT_RELEVANCE_THRESHOLD};
use crate::update::{insert_update, NewUpdate};
use crate::webhook_log::{insert_log, RECEIVE_UPDATES};

/// Score assumed when an item carries none.
pub const DEFAULT_RELEVANCE_SCORE: f64 = 5.0;

/// One item as pushed by the automation platform.
///
/// Field aliases from older payloads are accepted: `description` for
/// `content`, `source_url` for `url`, `source_name` for `source`.
///
/// `relevance_score` may arrive as a number or a numeric string. Any other
/// value marks only this item as unscorable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<Value>,
}

impl IncomingUpdate {
    /// Score used for filtering. `None` when the sender's value is not a number.
    pub fn score(&self) -> Option<f64> {
        match &self.relevance_score {
            None | Some(Value::Null) => Some(DEFAULT_RELEVANCE_SCORE),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Some(_) => None,
        }
    }

    fn into_new_update(self, relevance_score: f64) -> NewUpdate {
        NewUpdate {
            title: first_present([self.title]).unwrap_or_else(|| "Untitled".to_string()),
            content: first_present([self.content, self.description]).unwrap_or_default(),
            source_url: first_present([self.url, self.source_url]).unwrap_or_default(),
            source_name: first_present([self.source, self.source_name]).unwrap_or_default(),
            relevance_score,
        }
    }
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

/// Counts reported back to the sender of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IngestSummary {
    pub received: usize,
    pub saved: usize,
    pub threshold: i64,
}

/// Filter and store a batch of updates for an account.
///
/// `raw_payload` is the inbound body as received and is written verbatim to
/// the audit log. The account check, inserts and audit row share one
/// transaction.
pub async fn receive_updates(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: Option<&str>,
    updates: Vec<IncomingUpdate>,
    raw_payload: &Value,
) -> Result<IngestSummary> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM accounts WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .is_some();
    if !exists {
        return Err(DatabaseError::not_found("Account", user_id));
    }

    let threshold = governing_threshold(&mut tx, user_id, profile_id).await?;
    let received = updates.len();
    let now = Utc::now();
    let mut saved = 0;

    for incoming in updates {
        let Some(score) = incoming.score() else {
            debug!(user_id = %user_id, "Dropped update with unreadable relevance score");
            continue;
        };
        if score < threshold as f64 {
            continue;
        }
        insert_update(&mut tx, user_id, &incoming.into_new_update(score), now).await?;
        saved += 1;
    }

    insert_log(
        &mut tx,
        Some(user_id),
        RECEIVE_UPDATES,
        raw_payload,
        &json!({ "saved_count": saved, "threshold": threshold }),
        WebhookStatus::Success,
        now,
    )
    .await?;

    tx.commit().await?;

    info!(user_id = %user_id, received, saved, threshold, "Update batch ingested");
    Ok(IngestSummary {
        received,
        saved,
        threshold,
    })
}

async fn governing_threshold(
    conn: &mut SqliteConnection,
    user_id: &str,
    profile_id: Option<&str>,
) -> Result<i64> {
    if let Some(profile_id) = profile_id {
        let row = sqlx::query_as::<_, (Option<i64>,)>(
            r#"
            SELECT pr.relevance_threshold
            FROM profiles p
            LEFT JOIN preferences pr ON pr.profile_id = p.id
            WHERE p.id = ? AND p.user_id = ?
            "#,
        )
        .bind(profile_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((threshold,)) = row else {
            return Err(DatabaseError::not_found("Profile", profile_id));
        };
        return Ok(threshold.unwrap_or(DEFAULT_RELEVANCE_THRESHOLD));
    }

    let strictest = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT MAX(COALESCE(pr.relevance_threshold, ?))
        FROM profiles p
        LEFT JOIN preferences pr ON pr.profile_id = p.id
        WHERE p.user_id = ?
        "#,
    )
    .bind(DEFAULT_RELEVANCE_THRESHOLD)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    debug!(user_id = %user_id, ?strictest, "Resolved account threshold");
    Ok(strictest.unwrap_or(DEFAULT_RELEVANCE_THRESHOLD))
}
