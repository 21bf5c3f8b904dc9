//! Suggestion shapes, parsing of model output, and fallback values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SuggestError};

/// A monitoring topic suggested for a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    #[serde(default)]
    pub topic: String,
    /// One of regulatory, market, competitor or industry, as reported.
    #[serde(default = "default_topic_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// An information source suggested for a set of topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSuggestion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_source_category")]
    pub category: String,
}

/// Known online presence of a competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorPresence {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub blog: String,
    #[serde(default)]
    pub press: String,
    #[serde(default)]
    pub description: String,
}

fn default_topic_category() -> String {
    "industry".to_string()
}

fn default_source_category() -> String {
    "publication".to_string()
}

/// Items that must carry a non-empty key field to be kept.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for TopicSuggestion {
    fn key(&self) -> &str {
        &self.topic
    }
}

impl Keyed for SourceSuggestion {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for CompetitorPresence {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Slice out the outermost JSON array in free-form model output.
pub(crate) fn extract_json_array(content: &str) -> Option<&str> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    (start < end).then(|| &content[start..=end])
}

/// Parse model output into a non-empty list of typed items.
///
/// Elements that are not objects, fail to deserialize, or have an empty key
/// field are dropped.
pub(crate) fn parse_items<T>(content: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Keyed,
{
    let array = extract_json_array(content)
        .ok_or_else(|| SuggestError::Parse("no JSON array in completion".to_string()))?;

    let values: Vec<Value> =
        serde_json::from_str(array).map_err(|e| SuggestError::Parse(e.to_string()))?;

    let items: Vec<T> = values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|value| serde_json::from_value::<T>(value).ok())
        .filter(|item| !item.key().trim().is_empty())
        .collect();

    if items.is_empty() {
        return Err(SuggestError::Parse("completion had no usable items".to_string()));
    }

    Ok(items)
}

pub(crate) fn fallback_topics() -> Vec<TopicSuggestion> {
    [
        ("Industry regulations", "regulatory", "Track regulatory changes"),
        ("Market trends", "market", "Monitor market developments"),
        ("Competitor news", "competitor", "Track competitor activities"),
    ]
    .into_iter()
    .map(|(topic, category, description)| TopicSuggestion {
        topic: topic.to_string(),
        category: category.to_string(),
        description: description.to_string(),
    })
    .collect()
}

pub(crate) fn fallback_sources() -> Vec<SourceSuggestion> {
    vec![
        SourceSuggestion {
            name: "Reuters Business".to_string(),
            url: "https://www.reuters.com/business".to_string(),
            description: "Global business news".to_string(),
            category: "news".to_string(),
        },
        SourceSuggestion {
            name: "Industry Week".to_string(),
            url: "https://www.industryweek.com".to_string(),
            description: "Manufacturing and industry news".to_string(),
            category: "publication".to_string(),
        },
    ]
}

pub(crate) fn fallback_competitors(names: &[String]) -> Vec<CompetitorPresence> {
    names
        .iter()
        .map(|name| CompetitorPresence {
            name: name.clone(),
            website: String::new(),
            blog: String::new(),
            press: String::new(),
            description: "Competitor tracking enabled".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_array_from_prose() {
        let content = "Sure! Here you go:\n[{\"topic\": \"A\"}]\nHope that helps.";
        assert_eq!(extract_json_array(content), Some("[{\"topic\": \"A\"}]"));
        assert_eq!(extract_json_array("no array here"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }

    #[test]
    fn test_parse_applies_defaults_and_drops_keyless() {
        let content = r#"[
            {"topic": "Battery passports", "category": "regulatory"},
            {"category": "market", "description": "missing topic"},
            "just a string",
            {"topic": "   "},
            {"topic": "Cobalt prices", "description": "Input costs"}
        ]"#;

        let topics: Vec<TopicSuggestion> = parse_items(content).unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic, "Battery passports");
        assert_eq!(topics[0].description, "");
        assert_eq!(topics[1].category, "industry");
    }

    #[test]
    fn test_parse_rejects_empty_and_invalid() {
        assert!(parse_items::<SourceSuggestion>("[]").is_err());
        assert!(parse_items::<SourceSuggestion>("[{\"url\": \"https://x\"}]").is_err());
        assert!(parse_items::<SourceSuggestion>("[not json]").is_err());
    }

    #[test]
    fn test_fallbacks() {
        let topics = fallback_topics();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].category, "regulatory");

        let sources = fallback_sources();
        assert_eq!(sources[0].url, "https://www.reuters.com/business");

        let competitors = fallback_competitors(&["Acme".to_string(), "Globex".to_string()]);
        assert_eq!(competitors.len(), 2);
        assert_eq!(competitors[1].name, "Globex");
        assert_eq!(competitors[1].description, "Competitor tracking enabled");
    }
}
