//! SQLite persistence layer for the monitoring intake service.
//!
//! This crate provides async database operations for accounts, sessions,
//! monitoring profiles and their sources and preferences, inbound updates and
//! the integration audit log, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{account, session, Database, NewAccount};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:opticon.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Open an account and log it in
//!     let account = account::create_account(
//!         db.pool(),
//!         &NewAccount {
//!             email: "ops@acme.io",
//!             password: "correct horse battery",
//!             full_name: "Ada Ops",
//!             company_name: "Acme",
//!         },
//!     )
//!     .await?;
//!     session::create_session(db.pool(), &account.user_id, session::default_ttl()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod error;
pub mod ingest;
pub mod models;
pub mod password;
pub mod preference;
pub mod profile;
pub mod session;
pub mod source;
pub mod stats;
pub mod update;
pub mod validation;
pub mod webhook_log;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{DatabaseError, Result};
pub use ingest::{IncomingUpdate, IngestSummary};
pub use models::{
    Account, NewAccount, NewPreference, NewProfile, NewSource, Preference, Profile, Session,
    Source, Update, WebhookLog, WebhookStatus, DEFAULT_RELEVANCE_THRESHOLD,
};
pub use stats::AdminStats;
pub use update::UpdateFilter;
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Foreign keys are always enabled.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:data/opticon.db?mode=rwc").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// In-memory databases (`sqlite::memory:`) are private to one connection,
    /// so use a pool size of 1 for them.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Open a migrated, single-connection in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_to_profile_flow() {
        let db = Database::in_memory().await.unwrap();

        let account = account::create_account(
            db.pool(),
            &NewAccount {
                email: "flow@example.com",
                password: "long-enough-password",
                full_name: "Flo",
                company_name: "Flow Inc",
            },
        )
        .await
        .unwrap();

        let session = session::create_session(db.pool(), &account.user_id, session::default_ttl())
            .await
            .unwrap();
        let resolved = session::get_session(db.pool(), &session.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.user_id, account.user_id);

        let price = pricing::calculate_price(
            pricing::Frequency::Monthly,
            0,
            pricing::DeliveryMethod::Email,
        )
        .unwrap();
        let profile = profile::create_profile(
            db.pool(),
            &NewProfile {
                user_id: account.user_id.clone(),
                business_description: "Bakery".to_string(),
                topics: vec!["flour prices".to_string()],
                frequency: pricing::Frequency::Monthly,
                delivery_method: pricing::DeliveryMethod::Email,
                price: price.total,
            },
        )
        .await
        .unwrap();

        let profiles = profile::get_user_profiles(db.pool(), &account.user_id).await.unwrap();
        assert_eq!(profiles, vec![profile]);
    }

    #[tokio::test]
    async fn test_migrate_is_repeatable() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
    }
}
