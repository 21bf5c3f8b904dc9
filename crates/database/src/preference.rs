//! Per-profile preference storage.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::models::{NewPreference, Preference};
use crate::validation;

/// Create or replace a profile's preferences.
///
/// A second save overwrites every field; nothing is merged. The primary key on
/// `profile_id` guarantees one row per profile even under concurrent saves.
pub async fn save_preferences(
    pool: &SqlitePool,
    profile_id: &str,
    preferences: &NewPreference,
) -> Result<()> {
    validation::validate_threshold(preferences.relevance_threshold)?;

    let mut conn = pool.acquire().await?;
    upsert_preferences(&mut conn, profile_id, preferences, Utc::now()).await
}

pub(crate) async fn upsert_preferences(
    conn: &mut SqliteConnection,
    profile_id: &str,
    preferences: &NewPreference,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO preferences (profile_id, relevance_threshold, competitor_urls,
                                 keyword_alerts, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(profile_id) DO UPDATE SET
            relevance_threshold = excluded.relevance_threshold,
            competitor_urls = excluded.competitor_urls,
            keyword_alerts = excluded.keyword_alerts,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(profile_id)
    .bind(preferences.relevance_threshold)
    .bind(&preferences.competitor_urls)
    .bind(&preferences.keyword_alerts)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Get a profile's preferences.
pub async fn get_preferences(pool: &SqlitePool, profile_id: &str) -> Result<Option<Preference>> {
    let record = sqlx::query_as::<_, Preference>(
        r#"
        SELECT profile_id, relevance_threshold, competitor_urls, keyword_alerts,
               created_at, updated_at
        FROM preferences
        WHERE profile_id = ?
        "#,
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_account, create_test_profile, test_db};
    use crate::DatabaseError;

    #[tokio::test]
    async fn test_second_save_replaces_first() {
        let db = test_db().await;
        let account = create_test_account(&db, "prefs@example.com").await;
        let profile = create_test_profile(&db, &account.user_id).await;

        let first = NewPreference {
            relevance_threshold: 3,
            competitor_urls: "https://a.example.com,https://b.example.com".to_string(),
            keyword_alerts: "merger".to_string(),
        };
        save_preferences(db.pool(), &profile.id, &first).await.unwrap();

        let second = NewPreference {
            relevance_threshold: 8,
            ..NewPreference::default()
        };
        save_preferences(db.pool(), &profile.id, &second).await.unwrap();

        let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM preferences WHERE profile_id = ?")
            .bind(&profile.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = get_preferences(db.pool(), &profile.id).await.unwrap().unwrap();
        assert_eq!(stored.relevance_threshold, 8);
        assert_eq!(stored.competitor_urls, "");
        assert_eq!(stored.keyword_alerts, "");
    }

    #[tokio::test]
    async fn test_missing_preferences_is_none() {
        let db = test_db().await;
        assert!(get_preferences(db.pool(), "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_threshold_out_of_range() {
        let db = test_db().await;
        let account = create_test_account(&db, "range@example.com").await;
        let profile = create_test_profile(&db, &account.user_id).await;

        let prefs = NewPreference {
            relevance_threshold: 11,
            ..NewPreference::default()
        };
        let err = save_preferences(db.pool(), &profile.id, &prefs).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn test_preferences_require_profile() {
        let db = test_db().await;
        let result = save_preferences(db.pool(), "ghost", &NewPreference::default()).await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
    }
}
