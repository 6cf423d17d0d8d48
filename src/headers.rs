//! HTTP Headers Utility
//!
//! Helpers for turning caller-supplied header maps into `reqwest` headers.
//! Caller maps are plain `HashMap<String, String>` so that lookups here are
//! case-insensitive by hand, while `HeaderMap` normalizes names itself.

use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add multiple custom headers from a HashMap.
    ///
    /// Entries are applied in sorted key order, so when two keys differ only
    /// in case the one that sorts last wins (`content-type` over
    /// `Content-Type`).
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, ApiError> {
        let mut entries: Vec<_> = custom_headers.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        ApiError::Configuration(format!("Invalid header name '{name}': {e}"))
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        ApiError::Configuration(format!("Invalid header value for '{name}': {e}"))
    })?;
    Ok((header_name, header_value))
}

/// Case-insensitive key lookup on a caller-supplied header map.
pub fn has_header(headers: &HashMap<String, String>, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// Convert a caller header map into a `HeaderMap`, rejecting invalid entries.
pub fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, ApiError> {
    Ok(HttpHeaderBuilder::new().with_custom_headers(headers)?.build())
}

/// Fill in `defaults` underneath `headers`.
///
/// Names already present in `headers` are left alone; `keep` decides whether
/// a default is applied at all.
pub fn apply_default_headers(
    headers: &mut HeaderMap,
    defaults: &HeaderMap,
    mut keep: impl FnMut(&HeaderName) -> bool,
) {
    for (name, value) in defaults {
        if headers.contains_key(name) || !keep(name) {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }
}
