//! Response model and parsing.
//!
//! [`ApiResponse`] is a fully buffered response as returned by a transport.
//! [`parse_response`] turns it into a [`ResponseBody`], rejecting non-2xx
//! statuses with [`ApiError::Status`] while keeping the parsed error body.

use crate::error::ApiError;
use bytes::Bytes;
use reqwest::Url;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Buffered HTTP response.
///
/// All fields reflect the received response as-is.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Final URL (after redirects, if any were followed).
    pub url: Url,
    pub status: u16,
    /// Canonical reason phrase, `"Unknown"` for non-standard codes.
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Body as text (lossy UTF-8).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the body, ignoring the status.
    pub fn body(&self) -> ResponseBody {
        ResponseBody::parse(&self.body)
    }
}

/// Parsed response payload.
///
/// Serializes adjacently tagged (`{"type": "text", "value": "..."}`) so a
/// text body that happens to look like JSON keeps its variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Empty bytes give `Text("")`; anything that parses as JSON gives
    /// `Json`; everything else is returned as text.
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Text(String::from_utf8_lossy(bytes).into_owned());
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Deserialize into `T`. Text bodies are offered to `T` as a JSON string.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Self::Json(v) => v,
            Self::Text(s) => serde_json::Value::String(s),
        };
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl From<serde_json::Value> for ResponseBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for ResponseBody {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl PartialEq<serde_json::Value> for ResponseBody {
    fn eq(&self, other: &serde_json::Value) -> bool {
        self.as_json() == Some(other)
    }
}

impl PartialEq<&str> for ResponseBody {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

/// Map a raw response to its parsed body, rejecting non-2xx statuses.
pub fn parse_response(response: ApiResponse) -> Result<ResponseBody, ApiError> {
    let body = response.body();
    if response.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Status {
            status: response.status,
            status_text: response.status_text,
            body,
        })
    }
}
