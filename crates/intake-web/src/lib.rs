//! HTTP API for the monitoring intake service.
//!
//! Serves the signup/login flow, the profile wizard (AI suggestions, pricing,
//! submission), the inbound update endpoint used by the automation platform,
//! the account dashboard and admin statistics.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod notifier;
pub mod rate_limit;
pub mod routes;
pub mod state;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError, RateLimitConfig};
pub use error::ApiError;
pub use notifier::WebhookNotifier;
pub use state::AppState;

/// Build the application with its middleware and state attached.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// rate limiter can see peer addresses.
pub fn build_router(state: AppState) -> Router {
    let mut router = routes::router();
    if let Some(limiter) = rate_limit::ClientRateLimiter::new(&state.config.rate_limit) {
        router = router.layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::limit_requests,
        ));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
