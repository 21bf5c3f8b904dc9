//! Session issuance, lookup and revocation.
//!
//! A session is valid only while `now < expires_at`. Expired rows may linger
//! until [`purge_expired_sessions`] runs, so every lookup filters on expiry
//! inside the query itself.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::models::Session;

/// Session lifetime used by the login and signup flows.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// Length of generated session tokens.
const TOKEN_LENGTH: usize = 48;

/// Default session lifetime.
pub fn default_ttl() -> Duration {
    Duration::days(DEFAULT_SESSION_TTL_DAYS)
}

/// Create a session for an account, expiring `ttl` from now.
pub async fn create_session(pool: &SqlitePool, user_id: &str, ttl: Duration) -> Result<Session> {
    create_session_at(pool, user_id, Utc::now(), ttl).await
}

/// Create a session as of an explicit `now`.
pub async fn create_session_at(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<Session> {
    let session = Session {
        session_id: generate_token(),
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: now + ttl,
    };

    sqlx::query(
        r#"
        INSERT INTO sessions (session_id, user_id, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.session_id)
    .bind(&session.user_id)
    .bind(session.created_at)
    .bind(session.expires_at)
    .execute(pool)
    .await?;

    debug!(user_id = %user_id, expires_at = %session.expires_at, "Session created");
    Ok(session)
}

/// Get a session if it exists and has not expired.
pub async fn get_session(pool: &SqlitePool, session_id: &str) -> Result<Option<Session>> {
    get_session_at(pool, session_id, Utc::now()).await
}

/// Get a session if it exists and is unexpired at `now`.
pub async fn get_session_at(
    pool: &SqlitePool,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT session_id, user_id, created_at, expires_at
        FROM sessions
        WHERE session_id = ? AND expires_at > ?
        "#,
    )
    .bind(session_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Delete a session. Deleting a missing session is not an error.
pub async fn delete_session(pool: &SqlitePool, session_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE session_id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove sessions that expired at or before `now`.
pub async fn purge_expired_sessions(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_account, test_db};

    #[tokio::test]
    async fn test_session_valid_until_expiry() {
        let db = test_db().await;
        let account = create_test_account(&db, "session@example.com").await;
        let now = Utc::now();

        let session = create_session_at(db.pool(), &account.user_id, now, default_ttl())
            .await
            .unwrap();
        assert_eq!(session.session_id.len(), TOKEN_LENGTH);
        assert_eq!(session.expires_at, now + Duration::days(30));

        let found = get_session_at(db.pool(), &session.session_id, now).await.unwrap();
        assert_eq!(found.map(|s| s.user_id), Some(account.user_id.clone()));

        let just_before = session.expires_at - Duration::seconds(1);
        assert!(get_session_at(db.pool(), &session.session_id, just_before)
            .await
            .unwrap()
            .is_some());

        // Expired rows are treated as absent even before they are purged.
        assert!(get_session_at(db.pool(), &session.session_id, session.expires_at)
            .await
            .unwrap()
            .is_none());
        let later = session.expires_at + Duration::days(1);
        assert!(get_session_at(db.pool(), &session.session_id, later)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_session_is_idempotent() {
        let db = test_db().await;
        let account = create_test_account(&db, "logout@example.com").await;
        let session = create_session(db.pool(), &account.user_id, default_ttl())
            .await
            .unwrap();

        delete_session(db.pool(), &session.session_id).await.unwrap();
        assert!(get_session(db.pool(), &session.session_id).await.unwrap().is_none());

        delete_session(db.pool(), &session.session_id).await.unwrap();
        delete_session(db.pool(), "never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_multiple_sessions_per_account() {
        let db = test_db().await;
        let account = create_test_account(&db, "devices@example.com").await;

        let phone = create_session(db.pool(), &account.user_id, default_ttl()).await.unwrap();
        let laptop = create_session(db.pool(), &account.user_id, default_ttl()).await.unwrap();
        assert_ne!(phone.session_id, laptop.session_id);

        delete_session(db.pool(), &phone.session_id).await.unwrap();
        assert!(get_session(db.pool(), &laptop.session_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_session_requires_account() {
        let db = test_db().await;
        let result = create_session(db.pool(), "no-such-account", default_ttl()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_purge_expired_sessions() {
        let db = test_db().await;
        let account = create_test_account(&db, "purge@example.com").await;
        let now = Utc::now();

        let old = create_session_at(db.pool(), &account.user_id, now - Duration::days(31), default_ttl())
            .await
            .unwrap();
        let fresh = create_session_at(db.pool(), &account.user_id, now, default_ttl())
            .await
            .unwrap();

        assert_eq!(purge_expired_sessions(db.pool(), now).await.unwrap(), 1);
        assert!(get_session_at(db.pool(), &old.session_id, old.created_at)
            .await
            .unwrap()
            .is_none());
        assert!(get_session_at(db.pool(), &fresh.session_id, now).await.unwrap().is_some());
    }
}
