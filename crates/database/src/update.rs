//! Stored updates and delivery tracking.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::Update;

const UPDATE_COLUMNS: &str = "id, user_id, title, content, source_url, source_name, \
     relevance_score, delivered, created_at, delivered_at";

/// An update that passed filtering and is ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUpdate {
    pub title: String,
    pub content: String,
    pub source_url: String,
    pub source_name: String,
    pub relevance_score: f64,
}

/// Optional filters for listing an account's updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFilter {
    pub delivered: Option<bool>,
    pub min_relevance: Option<f64>,
    /// Case-insensitive substring of title or content.
    pub search: Option<String>,
    /// Exact source name.
    pub source: Option<String>,
    pub limit: Option<i64>,
}

pub(crate) async fn insert_update(
    conn: &mut SqliteConnection,
    user_id: &str,
    update: &NewUpdate,
    now: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO updates (user_id, title, content, source_url, source_name,
                             relevance_score, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&update.title)
    .bind(&update.content)
    .bind(&update.source_url)
    .bind(&update.source_name)
    .bind(update.relevance_score)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get an update by ID.
pub async fn get_update(pool: &SqlitePool, id: i64) -> Result<Option<Update>> {
    let sql = format!("SELECT {UPDATE_COLUMNS} FROM updates WHERE id = ?");
    let update = sqlx::query_as::<_, Update>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(update)
}

/// List an account's updates, newest first.
pub async fn get_user_updates(
    pool: &SqlitePool,
    user_id: &str,
    filter: &UpdateFilter,
) -> Result<Vec<Update>> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {UPDATE_COLUMNS} FROM updates WHERE user_id = "));
    query.push_bind(user_id);

    if let Some(delivered) = filter.delivered {
        query.push(" AND delivered = ").push_bind(delivered);
    }
    if let Some(min) = filter.min_relevance {
        query.push(" AND relevance_score >= ").push_bind(min);
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        query
            .push(" AND (lower(title) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR lower(content) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(source) = filter.source.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND source_name = ").push_bind(source.to_string());
    }

    query.push(" ORDER BY created_at DESC, id DESC");

    if let Some(limit) = filter.limit {
        query.push(" LIMIT ").push_bind(limit.max(0));
    }

    let updates = query.build_query_as::<Update>().fetch_all(pool).await?;
    Ok(updates)
}

/// Escape `LIKE` wildcards so search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Mark an update as delivered.
///
/// Repeated calls succeed and keep the first `delivered_at`.
pub async fn mark_delivered(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE updates
        SET delivered = 1, delivered_at = COALESCE(delivered_at, ?)
        WHERE id = ?
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Update", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_account, test_db};

    fn item(title: &str, source: &str, score: f64) -> NewUpdate {
        NewUpdate {
            title: title.to_string(),
            content: format!("{title} body"),
            source_url: format!("https://{source}.example.com"),
            source_name: source.to_string(),
            relevance_score: score,
        }
    }

    async fn seed(db: &crate::Database, user_id: &str) -> Vec<i64> {
        let mut conn = db.pool().acquire().await.unwrap();
        let mut ids = Vec::new();
        for update in [
            item("Tariff change announced", "Reuters", 6.0),
            item("Quarterly outlook", "Bloomberg", 8.5),
            item("New TARIFF schedule", "Reuters", 9.0),
        ] {
            ids.push(insert_update(&mut conn, user_id, &update, Utc::now()).await.unwrap());
        }
        ids
    }

    #[tokio::test]
    async fn test_updates_newest_first() {
        let db = test_db().await;
        let account = create_test_account(&db, "feed@example.com").await;
        let ids = seed(&db, &account.user_id).await;

        let updates = get_user_updates(db.pool(), &account.user_id, &UpdateFilter::default())
            .await
            .unwrap();
        let listed: Vec<_> = updates.iter().map(|u| u.id).collect();
        assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
    }

    #[tokio::test]
    async fn test_update_filters() {
        let db = test_db().await;
        let account = create_test_account(&db, "filters@example.com").await;
        seed(&db, &account.user_id).await;
        let pool = db.pool();
        let user = &account.user_id;

        let filter = UpdateFilter {
            min_relevance: Some(8.0),
            ..Default::default()
        };
        assert_eq!(get_user_updates(pool, user, &filter).await.unwrap().len(), 2);

        let filter = UpdateFilter {
            search: Some("tariff".to_string()),
            ..Default::default()
        };
        assert_eq!(get_user_updates(pool, user, &filter).await.unwrap().len(), 2);

        let filter = UpdateFilter {
            source: Some("Bloomberg".to_string()),
            ..Default::default()
        };
        let found = get_user_updates(pool, user, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Quarterly outlook");

        let filter = UpdateFilter {
            limit: Some(1),
            ..Default::default()
        };
        let found = get_user_updates(pool, user, &filter).await.unwrap();
        assert_eq!(found[0].title, "New TARIFF schedule");

        let filter = UpdateFilter {
            delivered: Some(true),
            ..Default::default()
        };
        assert!(get_user_updates(pool, user, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_wildcards_match_literally() {
        let db = test_db().await;
        let account = create_test_account(&db, "wildcards@example.com").await;
        seed(&db, &account.user_id).await;
        let mut conn = db.pool().acquire().await.unwrap();
        insert_update(&mut conn, &account.user_id, &item("Rates up 5%", "Fed", 7.0), Utc::now())
            .await
            .unwrap();
        drop(conn);

        let search = |text: &str| UpdateFilter {
            search: Some(text.to_string()),
            ..Default::default()
        };
        let pool = db.pool();
        let user = &account.user_id;

        let found = get_user_updates(pool, user, &search("%")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rates up 5%");
        assert!(get_user_updates(pool, user, &search("_")).await.unwrap().is_empty());
        assert!(get_user_updates(pool, user, &search("\\")).await.unwrap().is_empty());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn test_mark_delivered_is_idempotent() {
        let db = test_db().await;
        let account = create_test_account(&db, "deliver@example.com").await;
        let ids = seed(&db, &account.user_id).await;

        mark_delivered(db.pool(), ids[0]).await.unwrap();
        let first = get_update(db.pool(), ids[0]).await.unwrap().unwrap();
        assert!(first.delivered);
        let stamped = first.delivered_at.expect("delivered_at set");

        mark_delivered(db.pool(), ids[0]).await.unwrap();
        let second = get_update(db.pool(), ids[0]).await.unwrap().unwrap();
        assert!(second.delivered);
        assert_eq!(second.delivered_at, Some(stamped));

        let undelivered = get_update(db.pool(), ids[1]).await.unwrap().unwrap();
        assert!(!undelivered.delivered);
        assert!(undelivered.delivered_at.is_none());
    }

    #[tokio::test]
    async fn test_mark_delivered_unknown_id() {
        let db = test_db().await;
        let err = mark_delivered(db.pool(), 999).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { entity: "Update", .. }));
    }
}
