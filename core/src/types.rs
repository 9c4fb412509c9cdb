//! Request parameters, response formats and the typed entities used by the
//! presentation helpers.
//!
//! # Design
//! `Params` keeps insertion order so the outgoing query string and form body
//! list fields in the order the caller added them. Values are stored as text;
//! anything `Display` can be inserted.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;

/// Reserved parameter key that selects the response representation.
pub const FORMAT_KEY: &str = "format";

/// Ordered, string-keyed request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, used for logging.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// How a response body is handed back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Body text, untouched.
    Json,
    /// Ordered key/value mapping.
    #[default]
    Mapping,
    /// Object graph, convertible into typed structs.
    Object,
}

impl ResponseFormat {
    /// Parse the value of the reserved `format` parameter. Unknown values
    /// fall back to `Mapping`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "json" => ResponseFormat::Json,
            "object" => ResponseFormat::Object,
            _ => ResponseFormat::Mapping,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Mapping => "array",
            ResponseFormat::Object => "object",
        }
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Raw(String),
    Mapping(Value),
    Object(Value),
}

impl Decoded {
    pub fn format(&self) -> ResponseFormat {
        match self {
            Decoded::Raw(_) => ResponseFormat::Json,
            Decoded::Mapping(_) => ResponseFormat::Mapping,
            Decoded::Object(_) => ResponseFormat::Object,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Decoded::Raw(body) => Some(body),
            _ => None,
        }
    }

    /// The decoded JSON tree, for `Mapping` and `Object`.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Decoded::Mapping(value) | Decoded::Object(value) => Some(value),
            Decoded::Raw(_) => None,
        }
    }

    /// Deserialize into caller-owned types. Raw bodies are decoded first.
    pub fn into_typed<D: DeserializeOwned>(self) -> Result<D, ApiError> {
        let value = match self {
            Decoded::Raw(body) => crate::json::decode(&body)?,
            Decoded::Mapping(value) | Decoded::Object(value) => value,
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// Account that authored a tweet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(default)]
    pub id_str: String,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
}

/// A shortened link inside tweet text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: String,
    pub display_url: String,
}

/// An attached photo or video inside tweet text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaEntity {
    pub url: String,
    pub media_url_https: String,
    pub display_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tweet {
    pub id_str: String,
    #[serde(default, alias = "full_text")]
    pub text: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub entities: Entities,
}
