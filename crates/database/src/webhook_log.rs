//! Append-only audit log of integration events.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::models::{WebhookLog, WebhookStatus};

/// Webhook type for outbound profile notifications.
pub const PROFILE_SUBMISSION: &str = "profile_submission";

/// Webhook type for inbound update batches.
pub const RECEIVE_UPDATES: &str = "receive_updates";

/// Append one audit row.
pub async fn log_webhook(
    pool: &SqlitePool,
    user_id: Option<&str>,
    webhook_type: &str,
    payload: &Value,
    response: &Value,
    status: WebhookStatus,
) -> Result<i64> {
    let mut conn = pool.acquire().await?;
    insert_log(&mut conn, user_id, webhook_type, payload, response, status, Utc::now()).await
}

pub(crate) async fn insert_log(
    conn: &mut SqliteConnection,
    user_id: Option<&str>,
    webhook_type: &str,
    payload: &Value,
    response: &Value,
    status: WebhookStatus,
    now: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO webhook_logs (user_id, webhook_type, payload, response, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(webhook_type)
    .bind(payload.to_string())
    .bind(response.to_string())
    .bind(status.as_str())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recent log rows, newest first.
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<WebhookLog>> {
    let rows = sqlx::query_as::<_, WebhookLog>(
        r#"
        SELECT id, user_id, webhook_type, payload, response, status, created_at
        FROM webhook_logs
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
