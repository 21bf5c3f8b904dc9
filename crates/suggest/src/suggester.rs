//! The suggestion service used by the intake wizard.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api_types::ChatMessage;
use crate::cache::{cache_key, Clock, SystemClock, TtlCache, DEFAULT_TTL};
use crate::client::Completion;
use crate::error::Result;
use crate::types::{
    fallback_competitors, fallback_sources, fallback_topics, parse_items, CompetitorPresence,
    SourceSuggestion, TopicSuggestion,
};

/// Suggests topics, sources and competitor pages, backed by a completion
/// service and a per-kind TTL cache.
///
/// Every method always produces a list: remote failures degrade to a fixed
/// fallback that is not cached.
pub struct Suggester {
    completion: Arc<dyn Completion>,
    topics: TtlCache<Vec<TopicSuggestion>>,
    sources: TtlCache<Vec<SourceSuggestion>>,
    competitors: TtlCache<Vec<CompetitorPresence>>,
}

impl Suggester {
    /// Create a suggester with the default 15 minute TTL and system clock.
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self::with_clock(completion, DEFAULT_TTL, || Box::new(SystemClock) as Box<dyn Clock>)
    }

    /// Create a suggester whose caches read time from `clock`.
    pub fn with_clock<F>(completion: Arc<dyn Completion>, ttl: Duration, clock: F) -> Self
    where
        F: Fn() -> Box<dyn Clock>,
    {
        Self {
            completion,
            topics: TtlCache::with_clock(ttl, clock()),
            sources: TtlCache::with_clock(ttl, clock()),
            competitors: TtlCache::with_clock(ttl, clock()),
        }
    }

    /// Suggest monitoring topics for a business.
    pub async fn suggest_topics(&self, business_description: &str) -> Vec<TopicSuggestion> {
        let key = cache_key("topics", business_description);
        if let Some(hit) = self.topics.get(&key).await {
            debug!("Topic suggestions served from cache");
            return hit;
        }

        let prompt = format!(
            "Business description: \"{business_description}\"\n\n\
             Suggest 8-10 monitoring topics this business should track, covering \
             regulation, market trends, competitor activity and industry developments.\n\n\
             Respond with a JSON array only, each element shaped as\n\
             {{\"topic\": \"...\", \"category\": \"regulatory|market|competitor|industry\", \
             \"description\": \"why it matters\"}}"
        );
        let messages = vec![
            ChatMessage::system(
                "You are a business intelligence assistant. Reply with a valid JSON array.",
            ),
            ChatMessage::user(prompt),
        ];

        match self.request(messages).await {
            Ok(topics) => {
                self.topics.insert(key, topics.clone()).await;
                topics
            }
            Err(e) => {
                warn!("Topic suggestion failed, using fallback: {}", e);
                fallback_topics()
            }
        }
    }

    /// Suggest authoritative sources for a business and its topics.
    pub async fn suggest_sources(
        &self,
        business_description: &str,
        topics: &[String],
    ) -> Vec<SourceSuggestion> {
        let topics_str = topics.join(", ");
        let key = cache_key(
            "sources",
            &serde_json::json!({
                "business_description": business_description,
                "topics": topics_str,
            }),
        );
        if let Some(hit) = self.sources.get(&key).await {
            debug!("Source suggestions served from cache");
            return hit;
        }

        let prompt = format!(
            "Topics: {topics_str}\nBusiness context: {business_description}\n\n\
             List the 10 most authoritative sources for monitoring these topics: \
             regulators, trade publications, sector news outlets, associations, \
             research institutions and expert blogs.\n\n\
             Respond with a JSON array only, each element shaped as\n\
             {{\"name\": \"...\", \"url\": \"https://...\", \"description\": \"...\", \
             \"category\": \"government|publication|news|association|research|blog\"}}\n\
             Every URL must be complete."
        );
        let messages = vec![
            ChatMessage::system(
                "You are a research assistant who finds authoritative sources. \
                 Reply with a valid JSON array of real, reachable URLs.",
            ),
            ChatMessage::user(prompt),
        ];

        match self.request(messages).await {
            Ok(sources) => {
                self.sources.insert(key, sources.clone()).await;
                sources
            }
            Err(e) => {
                warn!("Source suggestion failed, using fallback: {}", e);
                fallback_sources()
            }
        }
    }

    /// Look up websites, blogs and press pages for named competitors.
    pub async fn find_competitors(&self, names: &[String]) -> Vec<CompetitorPresence> {
        let names_str = names.join(", ");
        let key = cache_key("competitors", &names_str);
        if let Some(hit) = self.competitors.get(&key).await {
            debug!("Competitor lookup served from cache");
            return hit;
        }

        let prompt = format!(
            "Companies: {names_str}\n\n\
             Find each company's online presence: main website, blog and press or news page.\n\n\
             Respond with a JSON array only, each element shaped as\n\
             {{\"name\": \"...\", \"website\": \"https://...\", \"blog\": \"https://...\", \
             \"press\": \"https://...\", \"description\": \"...\"}}\n\
             Leave a URL empty when it cannot be found."
        );
        let messages = vec![
            ChatMessage::system(
                "You are a competitive intelligence assistant. \
                 Reply with a valid JSON array of real URLs.",
            ),
            ChatMessage::user(prompt),
        ];

        match self.request(messages).await {
            Ok(competitors) => {
                self.competitors.insert(key, competitors.clone()).await;
                competitors
            }
            Err(e) => {
                warn!("Competitor lookup failed, using fallback: {}", e);
                fallback_competitors(names)
            }
        }
    }

    async fn request<T>(&self, messages: Vec<ChatMessage>) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned + crate::types::Keyed,
    {
        let content = self.completion.complete(messages).await?;
        parse_items(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_clock::ManualClock;
    use crate::error::SuggestError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with canned text and counts calls.
    struct CannedCompletion {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl CannedCompletion {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Completion for CannedCompletion {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .clone()
                .ok_or_else(|| SuggestError::Configuration("no key".to_string()))
        }
    }

    fn suggester_with(completion: Arc<CannedCompletion>, clock: &ManualClock) -> Suggester {
        let clock = clock.clone();
        Suggester::with_clock(completion, DEFAULT_TTL, move || {
            Box::new(clock.clone()) as Box<dyn Clock>
        })
    }

    #[tokio::test]
    async fn test_topics_parsed_and_cached() {
        let completion = CannedCompletion::replying(
            "Here are topics:\n[{\"topic\":\"Grid tariffs\",\"category\":\"regulatory\",\"description\":\"Cost driver\"}]",
        );
        let clock = ManualClock::new();
        let suggester = suggester_with(completion.clone(), &clock);

        let first = suggester.suggest_topics("Solar installer").await;
        let second = suggester.suggest_topics("Solar installer").await;

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].topic, "Grid tariffs");
        assert_eq!(first, second);
        assert_eq!(completion.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let completion = CannedCompletion::replying("[{\"topic\":\"Grid tariffs\"}]");
        let clock = ManualClock::new();
        let suggester = suggester_with(completion.clone(), &clock);

        suggester.suggest_topics("Solar installer").await;
        clock.advance(DEFAULT_TTL);
        suggester.suggest_topics("Solar installer").await;

        assert_eq!(completion.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_falls_back_without_caching() {
        let completion = CannedCompletion::failing();
        let clock = ManualClock::new();
        let suggester = suggester_with(completion.clone(), &clock);

        let topics = suggester.suggest_topics("Bakery").await;
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[1].topic, "Market trends");

        suggester.suggest_topics("Bakery").await;
        assert_eq!(completion.calls(), 2);
    }

    #[tokio::test]
    async fn test_unparsable_sources_fall_back() {
        let completion = CannedCompletion::replying("I could not find anything useful.");
        let clock = ManualClock::new();
        let suggester = suggester_with(completion, &clock);

        let sources = suggester
            .suggest_sources("Bakery", &["flour prices".to_string()])
            .await;
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "Reuters Business");
        assert_eq!(sources[1].category, "publication");
    }

    #[tokio::test]
    async fn test_competitor_fallback_per_name() {
        let completion = CannedCompletion::failing();
        let clock = ManualClock::new();
        let suggester = suggester_with(completion, &clock);

        let names = vec!["Acme".to_string(), "Globex".to_string()];
        let competitors = suggester.find_competitors(&names).await;

        assert_eq!(competitors.len(), 2);
        assert_eq!(competitors[0].name, "Acme");
        assert!(competitors[0].website.is_empty());
    }

    #[tokio::test]
    async fn test_kinds_cached_separately() {
        let completion = CannedCompletion::replying(
            "[{\"topic\":\"T\",\"name\":\"N\",\"url\":\"https://n.example\"}]",
        );
        let clock = ManualClock::new();
        let suggester = suggester_with(completion.clone(), &clock);

        suggester.suggest_topics("Acme").await;
        suggester.find_competitors(&["Acme".to_string()]).await;

        assert_eq!(completion.calls(), 2);
    }
}
