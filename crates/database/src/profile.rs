//! Monitoring profile storage.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{join_topics, NewPreference, NewProfile, NewSource, Profile};
use crate::{preference, source, validation};

const PROFILE_COLUMNS: &str = "id, user_id, business_description, topics, frequency, \
     delivery_method, price, created_at, updated_at";

/// Create a profile.
///
/// Fails with a storage error if the owning account does not exist.
pub async fn create_profile(pool: &SqlitePool, new: &NewProfile) -> Result<Profile> {
    validation::require("business_description", &new.business_description)?;

    let mut conn = pool.acquire().await?;
    let profile = insert_profile(&mut conn, new, Utc::now()).await?;

    info!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
    Ok(profile)
}

/// Create a profile together with its sources and optional preferences.
///
/// Everything is written in one transaction: either the whole submission is
/// stored or nothing is.
pub async fn submit_profile(
    pool: &SqlitePool,
    new: &NewProfile,
    sources: &[NewSource],
    preferences: Option<&NewPreference>,
) -> Result<Profile> {
    validation::require("business_description", &new.business_description)?;
    if let Some(prefs) = preferences {
        validation::validate_threshold(prefs.relevance_threshold)?;
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let profile = insert_profile(&mut tx, new, now).await?;
    source::insert_sources(&mut tx, &profile.id, sources, now).await?;
    if let Some(prefs) = preferences {
        preference::upsert_preferences(&mut tx, &profile.id, prefs, now).await?;
    }

    tx.commit().await?;

    info!(
        profile_id = %profile.id,
        user_id = %profile.user_id,
        sources = sources.len(),
        price = profile.price,
        "Profile submitted"
    );
    Ok(profile)
}

pub(crate) async fn insert_profile(
    conn: &mut SqliteConnection,
    new: &NewProfile,
    now: DateTime<Utc>,
) -> Result<Profile> {
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        user_id: new.user_id.clone(),
        business_description: new.business_description.trim().to_string(),
        topics: join_topics(&new.topics),
        frequency: new.frequency.as_str().to_string(),
        delivery_method: new.delivery_method.as_str().to_string(),
        price: new.price,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO profiles (id, user_id, business_description, topics, frequency,
                              delivery_method, price, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.user_id)
    .bind(&profile.business_description)
    .bind(&profile.topics)
    .bind(&profile.frequency)
    .bind(&profile.delivery_method)
    .bind(profile.price)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(profile)
}

/// Get a profile by ID.
pub async fn get_profile(pool: &SqlitePool, id: &str) -> Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?");
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Get all profiles owned by an account, newest first.
pub async fn get_user_profiles(pool: &SqlitePool, user_id: &str) -> Result<Vec<Profile>> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ? \
         ORDER BY created_at DESC, rowid DESC"
    );
    let profiles = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(profiles)
}

/// List every profile, newest first.
pub async fn list_profiles(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC, rowid DESC");
    let profiles = sqlx::query_as::<_, Profile>(&sql).fetch_all(pool).await?;

    Ok(profiles)
}
