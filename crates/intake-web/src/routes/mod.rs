//! Route handlers for the intake API.

pub mod admin;
pub mod auth;
pub mod health;
pub mod price;
pub mod profile;
pub mod updates;
pub mod user;
pub mod wizard;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Accounts and sessions
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Wizard
        .route("/api/suggest-topics", post(wizard::suggest_topics))
        .route("/api/suggest-sources", post(wizard::suggest_sources))
        .route("/api/find-competitors", post(wizard::find_competitors))
        .route("/api/calculate-price", post(price::calculate_price))
        .route("/api/submit-profile", post(profile::submit_profile))
        .route("/api/profile/:profile_id", get(profile::get_profile))
        // Automation platform
        .route("/api/receive-updates", post(updates::receive_updates))
        .route("/api/updates/:id", get(updates::list_updates))
        .route("/api/updates/:id/delivered", post(updates::mark_delivered))
        // Dashboard
        .route("/api/user/updates", get(user::updates))
        .route("/api/user/sources", get(user::sources))
        .route("/api/user/profiles", get(user::profiles))
        .route("/api/user/account", get(user::account))
        // Admin
        .route("/api/admin/stats", get(admin::stats_api))
}
