//! AI-assisted suggestions for the monitoring intake wizard.
//!
//! A [`Suggester`] asks a chat completion service for monitoring topics,
//! authoritative sources and competitor web presence. Replies are free-form
//! text; the JSON array inside is parsed into typed shapes with per-field
//! defaults. Successful results are memoized for 15 minutes. Any failure
//! (no API key, network error, unusable reply) yields a small fixed fallback.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use suggest::{PerplexityClient, Suggester};
//!
//! # async fn example() -> suggest::Result<()> {
//! let client = PerplexityClient::from_env()?;
//! let suggester = Suggester::new(Arc::new(client));
//!
//! let topics = suggester.suggest_topics("Regional craft brewery").await;
//! for topic in topics {
//!     println!("{} ({})", topic.topic, topic.category);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api_types;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
mod suggester;
pub mod types;

pub use async_trait::async_trait;

pub use api_types::ChatMessage;
pub use cache::{Clock, SystemClock, TtlCache};
pub use client::{Completion, PerplexityClient};
pub use config::SuggestConfig;
pub use error::{Result, SuggestError};
pub use suggester::Suggester;
pub use types::{CompetitorPresence, SourceSuggestion, TopicSuggestion};
