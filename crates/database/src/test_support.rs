//! Shared fixtures for unit tests.

use pricing::{DeliveryMethod, Frequency};

use crate::models::{Account, NewAccount, NewProfile, Profile};
use crate::{account, profile, Database};

pub(crate) async fn test_db() -> Database {
    Database::in_memory().await.unwrap()
}

pub(crate) fn new_account(email: &str) -> NewAccount<'_> {
    NewAccount {
        email,
        password: "hunter2hunter2",
        full_name: "Test User",
        company_name: "Test Co",
    }
}

pub(crate) async fn create_test_account(db: &Database, email: &str) -> Account {
    account::create_account(db.pool(), &new_account(email)).await.unwrap()
}

pub(crate) fn new_profile(user_id: &str) -> NewProfile {
    NewProfile {
        user_id: user_id.to_string(),
        business_description: "Lithium battery recycler".to_string(),
        topics: vec!["battery recycling".to_string(), "EU regulation".to_string()],
        frequency: Frequency::Weekly,
        delivery_method: DeliveryMethod::Email,
        price: 24,
    }
}

pub(crate) async fn create_test_profile(db: &Database, user_id: &str) -> Profile {
    profile::create_profile(db.pool(), &new_profile(user_id)).await.unwrap()
}
