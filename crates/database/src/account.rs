//! Account creation and credential verification.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{is_unique_violation, DatabaseError, Result};
use crate::models::{Account, NewAccount};
use crate::password;
use crate::validation;

const ACCOUNT_COLUMNS: &str =
    "user_id, email, password_hash, full_name, company_name, created_at, last_login";

/// Create a new account with a salted password hash.
///
/// Emails are trimmed and lowercased before storage.
pub async fn create_account(pool: &SqlitePool, new: &NewAccount<'_>) -> Result<Account> {
    validation::require("full_name", new.full_name)?;
    validation::require("company_name", new.company_name)?;
    validation::validate_email(new.email)?;
    validation::validate_password(new.password)?;

    let account = Account {
        user_id: Uuid::new_v4().to_string(),
        email: normalize_email(new.email),
        password_hash: password::hash_password(new.password)?,
        full_name: new.full_name.trim().to_string(),
        company_name: new.company_name.trim().to_string(),
        created_at: Utc::now(),
        last_login: None,
    };

    sqlx::query(
        r#"
        INSERT INTO accounts (user_id, email, password_hash, full_name, company_name, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&account.user_id)
    .bind(&account.email)
    .bind(&account.password_hash)
    .bind(&account.full_name)
    .bind(&account.company_name)
    .bind(account.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return DatabaseError::DuplicateEmail;
        }
        DatabaseError::Sqlx(e)
    })?;

    info!(user_id = %account.user_id, "Account created");
    Ok(account)
}

/// Verify an email/password pair and stamp `last_login`.
///
/// Unknown emails and wrong passwords both yield
/// [`DatabaseError::InvalidCredentials`], after the same hashing work.
pub async fn verify_login(pool: &SqlitePool, email: &str, password: &str) -> Result<Account> {
    let Some(mut account) = get_account_by_email(pool, email).await? else {
        password::verify_dummy(password);
        return Err(DatabaseError::InvalidCredentials);
    };

    if !password::verify_password(password, &account.password_hash)? {
        return Err(DatabaseError::InvalidCredentials);
    }

    let now = Utc::now();
    if let Err(err) = sqlx::query("UPDATE accounts SET last_login = ? WHERE user_id = ?")
        .bind(now)
        .bind(&account.user_id)
        .execute(pool)
        .await
    {
        warn!(user_id = %account.user_id, error = %err, "Failed to record last login");
    } else {
        account.last_login = Some(now);
    }

    Ok(account)
}

/// Get an account by ID.
pub async fn get_account(pool: &SqlitePool, user_id: &str) -> Result<Option<Account>> {
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ?");
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(account)
}

/// Get an account by email (case-insensitive).
pub async fn get_account_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Account>> {
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?");
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

    Ok(account)
}

/// Count total accounts.
pub async fn count_accounts(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_account, test_db};

    #[tokio::test]
    async fn test_create_and_fetch_account() {
        let db = test_db().await;
        let account = create_account(db.pool(), &new_account("Ada@Example.com"))
            .await
            .unwrap();

        assert_eq!(account.email, "ada@example.com");
        assert!(account.last_login.is_none());
        assert_ne!(account.password_hash, "hunter2hunter2");

        let fetched = get_account(db.pool(), &account.user_id).await.unwrap().unwrap();
        assert_eq!(fetched, account);
        assert_eq!(count_accounts(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        create_account(db.pool(), &new_account("dup@example.com")).await.unwrap();

        let err = create_account(db.pool(), &new_account("DUP@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateEmail));
        assert_eq!(count_accounts(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let db = test_db().await;
        let mut new = new_account("short@example.com");
        new.password = "1234";

        let err = create_account(db.pool(), &new).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_login() {
        let db = test_db().await;
        let account = create_account(db.pool(), &new_account("login@example.com"))
            .await
            .unwrap();

        let verified = verify_login(db.pool(), "login@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(verified.user_id, account.user_id);
        assert!(verified.last_login.is_some());

        let stored = get_account(db.pool(), &account.user_id).await.unwrap().unwrap();
        assert!(stored.last_login.is_some());
    }

    #[tokio::test]
    async fn test_verify_login_does_not_enumerate() {
        let db = test_db().await;
        create_account(db.pool(), &new_account("known@example.com")).await.unwrap();

        let wrong_password = verify_login(db.pool(), "known@example.com", "not-the-password")
            .await
            .unwrap_err();
        let unknown_email = verify_login(db.pool(), "nobody@example.com", "hunter2hunter2")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, DatabaseError::InvalidCredentials));
        assert!(matches!(unknown_email, DatabaseError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_unknown_email_still_runs_password_check() {
        let db = test_db().await;

        let err = verify_login(db.pool(), "ghost@example.com", "hunter2hunter2")
            .await
            .unwrap_err();

        assert!(matches!(err, DatabaseError::InvalidCredentials));
        assert!(password::dummy_hash_ready());
    }

    #[tokio::test]
    async fn test_missing_account_is_none() {
        let db = test_db().await;
        assert!(get_account(db.pool(), "missing").await.unwrap().is_none());
    }
}
