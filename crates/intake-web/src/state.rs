//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use suggest::Suggester;

use crate::config::Config;
use crate::notifier::WebhookNotifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// AI suggestion service with its cache.
    pub suggester: Arc<Suggester>,
    /// Profile submission webhook.
    pub notifier: WebhookNotifier,
    /// Runtime configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        suggester: Suggester,
        notifier: WebhookNotifier,
        config: Config,
    ) -> Self {
        Self {
            db,
            suggester: Arc::new(suggester),
            notifier,
            config: Arc::new(config),
        }
    }
}
