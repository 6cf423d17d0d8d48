//! HTTP transport abstraction.
//!
//! A [`Transport`] is the "fetch primitive": it takes a built
//! [`FetchRequest`] and returns a buffered [`ApiResponse`]. The default
//! implementation sends through `reqwest`; tests and embedders can inject
//! their own to observe the final URL/headers/body or return synthetic
//! responses.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::options::RedirectMode;
use crate::request::{FetchBody, FetchRequest};
use crate::response::ApiResponse;
use async_trait::async_trait;

/// Sends a fully built request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed transport.
///
/// Holds two clients because `reqwest` fixes the redirect policy per client:
/// one follows redirects up to the configured limit, the other never does.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    follow: reqwest::Client,
    no_redirect: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let follow = client_builder(config)?
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        let no_redirect = client_builder(config)?
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            follow,
            no_redirect,
        })
    }

    /// Use caller-provided clients. `no_redirect` must be built with
    /// `redirect::Policy::none()` for the `manual`/`error` modes to hold.
    pub fn from_clients(follow: reqwest::Client, no_redirect: reqwest::Client) -> Self {
        Self {
            follow,
            no_redirect,
        }
    }

    fn client_for(&self, mode: RedirectMode) -> &reqwest::Client {
        match mode {
            RedirectMode::Follow => &self.follow,
            RedirectMode::Error | RedirectMode::Manual => &self.no_redirect,
        }
    }
}

fn client_builder(config: &ClientConfig) -> Result<reqwest::ClientBuilder, ApiError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| ApiError::Configuration(format!("Invalid proxy '{proxy}': {e}")))?;
        builder = builder.proxy(proxy);
    }
    Ok(builder)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<ApiResponse, ApiError> {
        let redirect = request.redirect();
        let (method, url, headers, body, timeout) = request.into_parts();

        let mut builder = self
            .client_for(redirect)
            .request(method, url.clone())
            .headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = match body {
            Some(FetchBody::Json(text)) | Some(FetchBody::Form(text)) => builder.body(text),
            Some(FetchBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        if redirect == RedirectMode::Error && status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("<none>")
                .to_string();
            return Err(ApiError::Redirect(format!(
                "{url} answered {} with location {location} while redirect mode is 'error'",
                status.as_u16()
            )));
        }

        let final_url = response.url().clone();
        let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse {
            url: final_url,
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}
