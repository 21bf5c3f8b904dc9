//! Request extractors that reject with [`ApiError`] bodies.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// JSON body; malformed input is a 400 with the standard error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed input is a 400 with the standard error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters; malformed input is a 400 with the standard error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// A list sent either as a JSON array or as one comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let items = match Raw::deserialize(deserializer)? {
            Raw::One(joined) => joined.split(',').map(str::to_string).collect(),
            Raw::Many(items) => items,
        };

        Ok(StringList(
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        ))
    }
}

impl StringList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Required text field: present and not blank.
pub fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::InvalidInput(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_accepts_both_forms() {
        let from_str: StringList = serde_json::from_str("\"EU regulation, , battery recycling\"").unwrap();
        assert_eq!(from_str.0, vec!["EU regulation", "battery recycling"]);

        let from_array: StringList = serde_json::from_str("[\" a \", \"b\"]").unwrap();
        assert_eq!(from_array.0, vec!["a", "b"]);

        assert!(serde_json::from_str::<StringList>("42").is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required(&Some(" x ".to_string()), "m").unwrap(), "x");
        assert!(matches!(
            required(&Some("  ".to_string()), "Name is required"),
            Err(ApiError::InvalidInput(msg)) if msg == "Name is required"
        ));
        assert!(required(&None, "m").is_err());
    }
}
