//! Approved information sources for profiles.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::models::{NewSource, Source};

/// Save a profile's sources in submission order.
///
/// The first save numbers `display_order` from zero; later saves append after
/// the profile's current last source. The batch is written in one transaction
/// so readers never see a partial, gapped sequence.
pub async fn save_sources(pool: &SqlitePool, profile_id: &str, sources: &[NewSource]) -> Result<()> {
    let mut tx = pool.begin().await?;
    insert_sources(&mut tx, profile_id, sources, Utc::now()).await?;
    tx.commit().await?;

    Ok(())
}

pub(crate) async fn insert_sources(
    conn: &mut SqliteConnection,
    profile_id: &str,
    sources: &[NewSource],
    now: DateTime<Utc>,
) -> Result<()> {
    let next_order = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(display_order) + 1, 0) FROM sources WHERE profile_id = ?",
    )
    .bind(profile_id)
    .fetch_one(&mut *conn)
    .await?;

    for (index, source) in sources.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sources (profile_id, url, name, description, approved,
                                 suggested_by_ai, display_order, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile_id)
        .bind(source.url.trim())
        .bind(source.name.trim())
        .bind(&source.description)
        .bind(source.approved)
        .bind(source.suggested_by_ai)
        .bind(next_order + index as i64)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Get a profile's approved sources in display order.
pub async fn get_profile_sources(pool: &SqlitePool, profile_id: &str) -> Result<Vec<Source>> {
    let sources = sqlx::query_as::<_, Source>(
        r#"
        SELECT id, profile_id, url, name, description, approved, suggested_by_ai,
               display_order, created_at
        FROM sources
        WHERE profile_id = ? AND approved = 1
        ORDER BY display_order ASC
        "#,
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(sources)
}

/// Get the approved sources across all of an account's profiles.
///
/// Ordered by profile (newest first), then display order.
pub async fn get_user_sources(pool: &SqlitePool, user_id: &str) -> Result<Vec<Source>> {
    let sources = sqlx::query_as::<_, Source>(
        r#"
        SELECT s.id, s.profile_id, s.url, s.name, s.description, s.approved,
               s.suggested_by_ai, s.display_order, s.created_at
        FROM sources s
        INNER JOIN profiles p ON p.id = s.profile_id
        WHERE p.user_id = ? AND s.approved = 1
        ORDER BY p.created_at DESC, p.rowid DESC, s.display_order ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_account, create_test_profile, test_db};

    fn source(name: &str, approved: bool) -> NewSource {
        NewSource {
            name: name.to_string(),
            url: format!("https://{}.example.com", name.to_lowercase()),
            description: String::new(),
            approved,
            suggested_by_ai: false,
        }
    }

    #[tokio::test]
    async fn test_save_sources_preserves_order() {
        let db = test_db().await;
        let account = create_test_account(&db, "sources@example.com").await;
        let profile = create_test_profile(&db, &account.user_id).await;

        let batch = vec![source("Gamma", true), source("Alpha", true), source("Beta", true)];
        save_sources(db.pool(), &profile.id, &batch).await.unwrap();

        let stored = get_profile_sources(db.pool(), &profile.id).await.unwrap();
        let names: Vec<_> = stored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
        let orders: Vec<_> = stored.iter().map(|s| s.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_second_save_appends_after_existing() {
        let db = test_db().await;
        let account = create_test_account(&db, "append@example.com").await;
        let profile = create_test_profile(&db, &account.user_id).await;

        save_sources(db.pool(), &profile.id, &[source("First", true), source("Second", true)])
            .await
            .unwrap();
        save_sources(db.pool(), &profile.id, &[source("Third", true)]).await.unwrap();

        let stored = get_profile_sources(db.pool(), &profile.id).await.unwrap();
        let names: Vec<_> = stored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        let orders: Vec<_> = stored.iter().map(|s| s.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_unapproved_sources_hidden() {
        let db = test_db().await;
        let account = create_test_account(&db, "hidden@example.com").await;
        let profile = create_test_profile(&db, &account.user_id).await;

        let batch = vec![source("Kept", true), source("Rejected", false), source("Also", true)];
        save_sources(db.pool(), &profile.id, &batch).await.unwrap();

        let stored = get_profile_sources(db.pool(), &profile.id).await.unwrap();
        let names: Vec<_> = stored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Kept", "Also"]);
        assert_eq!(stored[1].display_order, 2);
    }

    #[tokio::test]
    async fn test_save_sources_unknown_profile_stores_nothing() {
        let db = test_db().await;
        let result = save_sources(db.pool(), "missing", &[source("Lost", true)]).await;
        assert!(result.is_err());
        assert!(get_profile_sources(db.pool(), "missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_sources_span_profiles() {
        let db = test_db().await;
        let account = create_test_account(&db, "span@example.com").await;
        let older = create_test_profile(&db, &account.user_id).await;
        let newer = create_test_profile(&db, &account.user_id).await;

        save_sources(db.pool(), &older.id, &[source("Old", true)]).await.unwrap();
        save_sources(db.pool(), &newer.id, &[source("NewA", true), source("NewB", true)])
            .await
            .unwrap();

        let stored = get_user_sources(db.pool(), &account.user_id).await.unwrap();
        let names: Vec<_> = stored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["NewA", "NewB", "Old"]);
    }
}
