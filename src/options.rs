//! Request options
//!
//! [`RequestOptions`] mirrors the option bag of a browser `fetch` call:
//! body, form data, query params, headers and the fetch request modes.
//! Every field has a default so callers only set what they need.
//!
//! ```rust
//! use api_utils::options::{RequestOptions, CacheMode};
//! use std::time::Duration;
//!
//! let options = RequestOptions::new()
//!     .json(serde_json::json!({"name": "Peter"}))
//!     .param("key", "value")
//!     .header("X-Head", "xHead")
//!     .cache(CacheMode::NoStore)
//!     .timeout(Duration::from_millis(2000));
//! assert!(options.body.is_some());
//! ```

use crate::error::ApiError;
use crate::query::Params;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Declares a fetch-style enum that round-trips through its kebab-case name.
macro_rules! fetch_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ApiError::Configuration(format!(
                        concat!("Unknown ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

fetch_enum! {
    /// HTTP cache mode of a request.
    CacheMode {
        Default => "default",
        NoStore => "no-store",
        Reload => "reload",
        NoCache => "no-cache",
        ForceCache => "force-cache",
        OnlyIfCached => "only-if-cached",
    }
    default Default
}

fetch_enum! {
    /// When client-level credential headers (`Authorization`, `Cookie`) are attached.
    Credentials {
        Omit => "omit",
        SameOrigin => "same-origin",
        Include => "include",
    }
    default SameOrigin
}

fetch_enum! {
    /// Which origins a request may target.
    RequestMode {
        SameOrigin => "same-origin",
        Cors => "cors",
        NoCors => "no-cors",
        Navigate => "navigate",
    }
    default SameOrigin
}

fetch_enum! {
    /// How redirects are handled.
    RedirectMode {
        /// Follow redirects up to the client limit.
        Follow => "follow",
        /// Fail with [`ApiError::Redirect`] on any 3xx.
        Error => "error",
        /// Return the 3xx response as-is.
        Manual => "manual",
    }
    default Follow
}

/// Referrer of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Referrer {
    /// Let the client decide; no `Referer` header is added.
    #[default]
    Client,
    /// Explicitly send no referrer.
    NoReferrer,
    /// Send `Referer: <url>`.
    Url(String),
}

impl From<String> for Referrer {
    fn from(s: String) -> Self {
        match s.as_str() {
            "client" => Self::Client,
            "" => Self::NoReferrer,
            _ => Self::Url(s),
        }
    }
}

impl From<&str> for Referrer {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Referrer> for String {
    fn from(r: Referrer) -> Self {
        match r {
            Referrer::Client => "client".to_string(),
            Referrer::NoReferrer => String::new(),
            Referrer::Url(url) => url,
        }
    }
}

/// Form payload: url-encoded fields or a pre-built multipart form.
#[derive(Debug)]
pub enum FormData {
    /// Encoded as `application/x-www-form-urlencoded`.
    Fields(Params),
    /// Sent as-is; the transport sets the multipart boundary header.
    Multipart(reqwest::multipart::Form),
}

impl From<Params> for FormData {
    fn from(params: Params) -> Self {
        Self::Fields(params)
    }
}

impl From<reqwest::multipart::Form> for FormData {
    fn from(form: reqwest::multipart::Form) -> Self {
        Self::Multipart(form)
    }
}

/// Per-request options.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// JSON body. Falsy values (`null`, `false`, `0`, `""`) count as no body.
    pub body: Option<serde_json::Value>,
    pub form_data: Option<FormData>,
    /// Query parameters appended to the endpoint.
    pub params: Option<Params>,
    pub headers: HashMap<String, String>,
    pub cache: CacheMode,
    pub credentials: Credentials,
    pub mode: RequestMode,
    pub redirect: RedirectMode,
    pub referrer: Referrer,
    /// Zero means no per-request limit.
    pub timeout: Duration,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize any `Serialize` value as the JSON body.
    pub fn json_from<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, form: impl Into<FormData>) -> Self {
        self.form_data = Some(form.into());
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Add a single query parameter value.
    pub fn param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.params.get_or_insert_with(Params::new).append(key, value);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn redirect(mut self, redirect: RedirectMode) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn referrer(mut self, referrer: impl Into<Referrer>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JavaScript-style truthiness of a JSON body.
pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_fetch_defaults() {
        let options = RequestOptions::default();
        assert_eq!(options.cache, CacheMode::Default);
        assert_eq!(options.credentials, Credentials::SameOrigin);
        assert_eq!(options.mode, RequestMode::SameOrigin);
        assert_eq!(options.redirect, RedirectMode::Follow);
        assert_eq!(options.referrer, Referrer::Client);
        assert_eq!(options.timeout, Duration::ZERO);
        assert!(options.headers.is_empty());
    }

    #[test]
    fn modes_parse_from_fetch_spelling() {
        assert_eq!("no-store".parse::<CacheMode>().unwrap(), CacheMode::NoStore);
        assert_eq!("only-if-cached".parse::<CacheMode>().unwrap(), CacheMode::OnlyIfCached);
        assert_eq!("no-cors".parse::<RequestMode>().unwrap(), RequestMode::NoCors);
        assert_eq!("include".parse::<Credentials>().unwrap(), Credentials::Include);
        assert_eq!("manual".parse::<RedirectMode>().unwrap(), RedirectMode::Manual);
        assert!("sometimes".parse::<RedirectMode>().is_err());
        assert_eq!(CacheMode::ForceCache.to_string(), "force-cache");
    }

    #[test]
    fn modes_serialize_with_fetch_spelling() {
        assert_eq!(serde_json::to_string(&RequestMode::SameOrigin).unwrap(), "\"same-origin\"");
        let mode: CacheMode = serde_json::from_str("\"no-cache\"").unwrap();
        assert_eq!(mode, CacheMode::NoCache);
    }

    #[test]
    fn referrer_round_trips_through_strings() {
        assert_eq!(Referrer::from("client"), Referrer::Client);
        assert_eq!(Referrer::from(""), Referrer::NoReferrer);
        assert_eq!(
            Referrer::from("https://example.com/page"),
            Referrer::Url("https://example.com/page".into())
        );
        assert_eq!(serde_json::to_string(&Referrer::NoReferrer).unwrap(), "\"\"");
    }

    #[test]
    fn json_from_serializes_typed_bodies() {
        #[derive(Serialize)]
        struct Person<'a> {
            name: &'a str,
            age: u8,
        }
        let options = RequestOptions::new()
            .json_from(&Person {
                name: "Peter",
                age: 12,
            })
            .unwrap();
        assert_eq!(options.body, Some(json!({"name": "Peter", "age": 12})));
    }

    #[test]
    fn param_builder_accumulates() {
        let options = RequestOptions::new().param("a", "1").param("a", "2");
        let params = options.params.unwrap();
        assert_eq!(params.get("a").unwrap().len(), 2);
    }

    #[test]
    fn truthiness_follows_javascript() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1.5)));
    }
}
