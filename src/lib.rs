//! # api-utils
//!
//! Small HTTP request helpers on top of `reqwest`.
//!
//! ## Features
//!
//! - **Verb helpers**: `get`, `post`, `put`, `delete`, `patch`, each with a
//!   `_raw` variant that skips status mapping.
//! - **Body serialization**: JSON bodies and url-encoded or multipart forms,
//!   with the matching `Content-Type` filled in unless the caller set one.
//! - **Query strings**: parameter maps with repeated keys appended to the endpoint.
//! - **Status-aware parsing**: 2xx bodies resolve to JSON or text, anything
//!   else is an [`ApiError::Status`] carrying the parsed error body.
//! - **Fetch-style options**: cache, credentials, mode, redirect, referrer and
//!   per-request timeouts.
//! - **Pluggable transport and interceptors** for tests and instrumentation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use api_utils::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ApiError> {
//!     let client = ApiClient::builder()
//!         .base_url("http://what/")
//!         .build()?;
//!
//!     let body = client
//!         .post(
//!             "frus",
//!             RequestOptions::new()
//!                 .json(serde_json::json!({"name": "Peter"}))
//!                 .param("key", "value"),
//!         )
//!         .await?;
//!     println!("{body:?}");
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod interceptor;
pub mod options;
pub mod query;
pub mod request;
pub mod response;
pub mod telemetry;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder, delete, get, patch, post, put};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, ErrorCategory, Result};
pub use interceptor::{HttpInterceptor, LoggingInterceptor, RequestContext};
pub use options::{
    CacheMode, Credentials, FormData, RedirectMode, Referrer, RequestMode, RequestOptions,
};
pub use query::{Params, add_query, to_url_params};
pub use request::{FetchBody, FetchRequest, build_fetch_request};
pub use response::{ApiResponse, ResponseBody, parse_response};
pub use transport::{ReqwestTransport, Transport};

/// Re-exports for glob import.
pub mod prelude {
    pub use crate::client::ApiClient;
    pub use crate::error::{ApiError, ErrorCategory};
    pub use crate::options::{
        CacheMode, Credentials, FormData, RedirectMode, RequestMode, RequestOptions,
    };
    pub use crate::query::Params;
    pub use crate::response::{ApiResponse, ResponseBody};
    pub use reqwest::Method;
}
