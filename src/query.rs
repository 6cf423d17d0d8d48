//! Query-string building
//!
//! [`Params`] is an ordered multimap: a key holds one value or a list of
//! values, and lists expand to repeated `key=value` pairs when encoded.
//!
//! ```rust
//! use api_utils::query::{Params, add_query};
//!
//! let mut params = Params::new();
//! params.insert("q", "rust lang");
//! params.extend_values("tag", ["a", "b"]);
//!
//! assert_eq!(
//!     add_query("http://what/frus", Some(&params)),
//!     "http://what/frus?q=rust%20lang&tag=a&tag=b"
//! );
//! ```

use crate::error::ApiError;
use serde_json::Value;
use std::collections::HashMap;

/// Ordered `key -> [values]` map used for query strings and url-encoded forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to a single value, replacing any previous values.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => *values = vec![value],
            None => self.entries.push((key, vec![value])),
        }
        self
    }

    /// Add one more value under `key`.
    pub fn append<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
        self
    }

    /// Add every value of `values` under `key`.
    pub fn extend_values<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        for value in values {
            self.append(key.clone(), value);
        }
        self
    }

    /// Chainable variant of [`Params::insert`].
    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over flattened `(key, value)` pairs in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Build params from a JSON object. Arrays become repeated keys, strings
    /// are used as-is and any other value is rendered with its JSON text.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::Configuration(format!(
                "params must be a JSON object, got {value}"
            )));
        };
        let mut params = Self::new();
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    // An empty list contributes no pairs but keeps the key slot.
                    if items.is_empty() {
                        params.entries.push((key.clone(), Vec::new()));
                    }
                    for item in items {
                        params.append(key.clone(), json_scalar(item));
                    }
                }
                other => {
                    params.append(key.clone(), json_scalar(other));
                }
            }
        }
        Ok(params)
    }
}

fn json_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for Params {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Percent-encode a single `key=value` pair.
pub fn url_parameter(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

/// Encode all pairs of `params` joined by `&`.
pub fn to_url_params(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| url_parameter(k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the encoded `params` to `endpoint`.
///
/// Missing or empty params leave the endpoint untouched. An endpoint that
/// already carries a query string is extended with `&`.
pub fn add_query(endpoint: &str, params: Option<&Params>) -> String {
    let Some(params) = params.filter(|p| !p.is_empty()) else {
        return endpoint.to_string();
    };
    let query = to_url_params(params);
    if query.is_empty() {
        return endpoint.to_string();
    }
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}{query}")
}
