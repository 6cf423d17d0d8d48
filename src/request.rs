//! Building fetch requests
//!
//! [`build_fetch_request`] turns a method, an endpoint and [`RequestOptions`]
//! into a transport-agnostic [`FetchRequest`]: the query string is appended,
//! the body is serialized and the implicit headers are filled in.

use crate::error::ApiError;
use crate::headers::{has_header, to_header_map};
use crate::options::{
    CacheMode, Credentials, FormData, RedirectMode, Referrer, RequestMode, RequestOptions,
    is_truthy,
};
use crate::query::{add_query, to_url_params};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue, PRAGMA, REFERER};
use reqwest::{Method, Url};
use std::time::Duration;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Serialized request body.
#[derive(Debug)]
pub enum FetchBody {
    /// JSON text.
    Json(String),
    /// `application/x-www-form-urlencoded` text.
    Form(String),
    /// Multipart form passed through untouched.
    Multipart(reqwest::multipart::Form),
}

impl FetchBody {
    /// Text of the body, `None` for multipart forms.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(s) | Self::Form(s) => Some(s),
            Self::Multipart(_) => None,
        }
    }
}

/// A fully built request, ready to hand to a [`Transport`](crate::transport::Transport).
#[derive(Debug)]
pub struct FetchRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<FetchBody>,
    cache: CacheMode,
    credentials: Credentials,
    mode: RequestMode,
    redirect: RedirectMode,
    referrer: Referrer,
    timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&FetchBody> {
        self.body.as_ref()
    }

    pub fn cache(&self) -> CacheMode {
        self.cache
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials
    }

    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    pub fn redirect(&self) -> RedirectMode {
        self.redirect
    }

    pub fn referrer(&self) -> &Referrer {
        &self.referrer
    }

    /// Per-request timeout; `None` means no limit.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Split into the parts a transport needs to send it.
    pub fn into_parts(self) -> (Method, Url, HeaderMap, Option<FetchBody>, Option<Duration>) {
        (self.method, self.url, self.headers, self.body, self.timeout)
    }
}

/// Build a [`FetchRequest`] from an absolute endpoint and options.
///
/// Fails with [`ApiError::MultipleBodies`] when both a (truthy) JSON body and
/// form data are given, and with [`ApiError::InvalidUrl`] when the endpoint
/// plus query does not parse as an absolute URL.
pub fn build_fetch_request(
    method: Method,
    endpoint: &str,
    options: RequestOptions,
) -> Result<FetchRequest, ApiError> {
    let RequestOptions {
        body,
        form_data,
        params,
        headers: caller_headers,
        cache,
        credentials,
        mode,
        redirect,
        referrer,
        timeout,
    } = options;

    let body = body.filter(is_truthy);
    if body.is_some() && form_data.is_some() {
        return Err(ApiError::MultipleBodies);
    }

    let full_url = add_query(endpoint, params.as_ref());
    let url = Url::parse(&full_url).map_err(|e| ApiError::InvalidUrl {
        url: full_url.clone(),
        reason: e.to_string(),
    })?;

    let mut headers = to_header_map(&caller_headers)?;
    let has_content_type = has_header(&caller_headers, CONTENT_TYPE.as_str());

    let fetch_body = match (body, form_data) {
        (Some(json), None) => {
            if !has_content_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            }
            Some(FetchBody::Json(serde_json::to_string(&json)?))
        }
        (None, Some(FormData::Fields(fields))) => {
            if !has_content_type {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            }
            Some(FetchBody::Form(to_url_params(&fields)))
        }
        (None, Some(FormData::Multipart(form))) => Some(FetchBody::Multipart(form)),
        (None, None) => None,
        (Some(_), Some(_)) => return Err(ApiError::MultipleBodies),
    };

    apply_cache_headers(&mut headers, cache);
    apply_referrer(&mut headers, &referrer)?;

    Ok(FetchRequest {
        method,
        url,
        headers,
        body: fetch_body,
        cache,
        credentials,
        mode,
        redirect,
        referrer,
        timeout: (!timeout.is_zero()).then_some(timeout),
    })
}

fn apply_cache_headers(headers: &mut HeaderMap, cache: CacheMode) {
    match cache {
        CacheMode::NoStore | CacheMode::Reload => {
            if !headers.contains_key(CACHE_CONTROL) {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            }
            if !headers.contains_key(PRAGMA) {
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            }
        }
        CacheMode::NoCache => {
            if !headers.contains_key(CACHE_CONTROL) {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
            }
        }
        CacheMode::Default | CacheMode::ForceCache | CacheMode::OnlyIfCached => {}
    }
}

fn apply_referrer(headers: &mut HeaderMap, referrer: &Referrer) -> Result<(), ApiError> {
    if let Referrer::Url(url) = referrer
        && !headers.contains_key(REFERER)
    {
        headers.insert(REFERER, HeaderValue::from_str(url)?);
    }
    Ok(())
}
