//! Read-only admin rollups.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::Result;

/// Number of topic strings reported by default.
pub const DEFAULT_TOP_TOPICS: i64 = 10;

/// Profile count for one frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FrequencyCount {
    pub frequency: String,
    pub count: i64,
}

/// Occurrences of one stored topic string.
///
/// Grouping is by exact string: differently worded but equivalent topic
/// lists are counted separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TopicCount {
    pub topics: String,
    pub count: i64,
}

/// Aggregate figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminStats {
    pub total_accounts: i64,
    pub total_profiles: i64,
    /// Sum of all profile prices.
    pub total_mrr: i64,
    pub average_price: f64,
    pub frequency_breakdown: Vec<FrequencyCount>,
    pub popular_topics: Vec<TopicCount>,
}

/// Compute admin statistics from a single consistent snapshot.
pub async fn admin_stats(pool: &SqlitePool, top_topics: i64) -> Result<AdminStats> {
    let mut tx = pool.begin().await?;

    let total_accounts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
        .fetch_one(&mut *tx)
        .await?;

    let (total_profiles, total_mrr) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COALESCE(SUM(price), 0) FROM profiles",
    )
    .fetch_one(&mut *tx)
    .await?;

    let frequency_breakdown = sqlx::query_as::<_, FrequencyCount>(
        r#"
        SELECT frequency, COUNT(*) AS count
        FROM profiles
        GROUP BY frequency
        ORDER BY count DESC, frequency ASC
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let popular_topics = sqlx::query_as::<_, TopicCount>(
        r#"
        SELECT topics, COUNT(*) AS count
        FROM profiles
        GROUP BY topics
        ORDER BY count DESC, topics ASC
        LIMIT ?
        "#,
    )
    .bind(top_topics.max(0))
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let average_price = if total_profiles > 0 {
        total_mrr as f64 / total_profiles as f64
    } else {
        0.0
    };

    Ok(AdminStats {
        total_accounts,
        total_profiles,
        total_mrr,
        average_price,
        frequency_breakdown,
        popular_topics,
    })
}
