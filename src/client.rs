//! High-level API client with one method per HTTP verb.
//!
//! [`ApiClient`] resolves endpoints against an optional base URL, builds the
//! request from [`RequestOptions`], runs interceptors, sends it through a
//! [`Transport`] and parses the response.
//!
//! # Builder pattern
//!
//! ```no_run
//! use api_utils::{ApiClient, RequestOptions};
//!
//! # async fn demo() -> api_utils::Result<()> {
//! let client = ApiClient::builder()
//!     .base_url("https://httpbin.org/")
//!     .user_agent("my-app/1.0")
//!     .build()?;
//!
//! // Relative endpoints are joined to the base URL, params become the query.
//! let body = client
//!     .get("get", RequestOptions::new().param("key", "value"))
//!     .await?;
//!
//! // Non-2xx statuses come back as `ApiError::Status` with the parsed body.
//! if let Err(err) = client.post("status/500", RequestOptions::new()).await {
//!     println!("{} {:?}", err, err.body());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # One-shot helpers
//!
//! Module-level functions use a process-wide client configured from the
//! environment:
//!
//! ```no_run
//! # async fn demo() -> api_utils::Result<()> {
//! let body = api_utils::get("https://httpbin.org/get", Default::default()).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::ApiError;
use crate::headers::{apply_default_headers, to_header_map};
use crate::interceptor::{HttpInterceptor, RequestContext};
use crate::options::{Credentials, RequestMode, RequestOptions};
use crate::request::{FetchRequest, build_fetch_request};
use crate::response::{ApiResponse, ResponseBody, parse_response};
use crate::transport::{ReqwestTransport, Transport};
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderName};
use reqwest::{Method, Url};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// HTTP client that builds, sends and parses requests.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    base: Option<Url>,
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client with default configuration and the `reqwest` transport.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_config_and_transport(config, transport)
    }

    pub fn with_config_and_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        let base = config.base()?;
        Ok(Self {
            config,
            base,
            transport,
            interceptors: Vec::new(),
        })
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Replace the transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Append an interceptor; interceptors run in insertion order.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve `endpoint` against the base URL. Absolute URLs pass through.
    pub fn resolve_endpoint(&self, endpoint: &str) -> Result<String, ApiError> {
        if Url::parse(endpoint).is_ok() {
            return Ok(endpoint.to_string());
        }
        let Some(base) = &self.base else {
            return Err(ApiError::InvalidUrl {
                url: endpoint.to_string(),
                reason: "relative endpoint requires a base URL".to_string(),
            });
        };
        base.join(endpoint)
            .map(String::from)
            .map_err(|e| ApiError::InvalidUrl {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build the request that would be sent, with client defaults applied.
    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<FetchRequest, ApiError> {
        let resolved = self.resolve_endpoint(endpoint)?;
        let mut request = build_fetch_request(method, &resolved, options)?;

        let same_origin = self
            .base
            .as_ref()
            .is_none_or(|base| base.origin() == request.url().origin());

        if request.mode() == RequestMode::SameOrigin
            && !same_origin
            && let Some(base) = &self.base
        {
            return Err(ApiError::ModeViolation {
                url: request.url().to_string(),
                origin: base.origin().ascii_serialization(),
            });
        }

        let attach_credentials = match request.credentials() {
            Credentials::Omit => false,
            Credentials::SameOrigin => same_origin,
            Credentials::Include => true,
        };
        let defaults = to_header_map(&self.config.headers)?;
        apply_default_headers(request.headers_mut(), &defaults, |name| {
            let keep = attach_credentials || !is_credential_header(name);
            if !keep {
                tracing::trace!(
                    target: "api_utils::http",
                    header = %name,
                    "credential header withheld"
                );
            }
            keep
        });

        if request.timeout().is_none() {
            request.set_timeout(self.config.timeout.filter(|t| !t.is_zero()));
        }
        Ok(request)
    }

    /// Send a request and return the raw response without status mapping.
    pub async fn request_raw(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(method, endpoint, options)
            .await
            .map(|(_, response)| response)
    }

    /// Send a request and parse the body; non-2xx statuses become
    /// [`ApiError::Status`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let (ctx, response) = self.send(method, endpoint, options).await?;
        parse_response(response).inspect_err(|error| {
            tracing::warn!(
                target: "api_utils::http",
                request_id = %ctx.request_id,
                url = %ctx.url,
                status = error.status_code(),
                "request rejected"
            );
            self.notify_error(&ctx, error);
        })
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<(RequestContext, ApiResponse), ApiError> {
        let mut request = self.build_request(method, endpoint, options)?;
        let ctx = RequestContext::new(request.method().clone(), request.url().as_str());

        for interceptor in &self.interceptors {
            request = interceptor
                .on_before_send(&ctx, request)
                .inspect_err(|error| self.notify_error(&ctx, error))?;
        }

        tracing::debug!(
            target: "api_utils::http",
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            timeout_ms = request.timeout().map(|t| t.as_millis() as u64),
            "fetch"
        );

        let response = self
            .transport
            .fetch(request)
            .await
            .inspect_err(|error| self.notify_error(&ctx, error))?;

        for interceptor in &self.interceptors {
            interceptor
                .on_response(&ctx, &response)
                .inspect_err(|error| self.notify_error(&ctx, error))?;
        }
        tracing::debug!(
            target: "api_utils::http",
            request_id = %ctx.request_id,
            status = response.status,
            "response"
        );
        Ok((ctx, response))
    }

    fn notify_error(&self, ctx: &RequestContext, error: &ApiError) {
        for interceptor in &self.interceptors {
            interceptor.on_error(ctx, error);
        }
    }

    pub async fn get(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.request(Method::GET, endpoint, options).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.request(Method::POST, endpoint, options).await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.request(Method::PUT, endpoint, options).await
    }

    pub async fn delete(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.request(Method::DELETE, endpoint, options).await
    }

    pub async fn patch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.request(Method::PATCH, endpoint, options).await
    }

    pub async fn get_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request_raw(Method::GET, endpoint, options).await
    }

    pub async fn post_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request_raw(Method::POST, endpoint, options).await
    }

    pub async fn put_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request_raw(Method::PUT, endpoint, options).await
    }

    pub async fn delete_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request_raw(Method::DELETE, endpoint, options).await
    }

    pub async fn patch_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.request_raw(Method::PATCH, endpoint, options).await
    }
}

fn is_credential_header(name: &HeaderName) -> bool {
    name == AUTHORIZATION || name == COOKIE
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ClientConfigBuilder,
    transport: Option<Arc<dyn Transport>>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl ApiClientBuilder {
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config = self.config.base_url(base_url);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.config = self.config.header(key, value);
        self
    }

    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.config = self.config.bearer_auth(token);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.config = self.config.proxy(proxy);
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config = self.config.max_redirects(max);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.build()?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };
        let mut client = ApiClient::with_config_and_transport(config, transport)?;
        client.interceptors = self.interceptors;
        Ok(client)
    }
}

fn default_client() -> Result<&'static ApiClient, ApiError> {
    static CLIENT: OnceLock<ApiClient> = OnceLock::new();
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = ApiClient::with_config(ClientConfig::from_env()?)?;
    Ok(CLIENT.get_or_init(|| client))
}

/// `GET` through the process-wide client.
pub async fn get(endpoint: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
    default_client()?.get(endpoint, options).await
}

/// `POST` through the process-wide client.
pub async fn post(endpoint: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
    default_client()?.post(endpoint, options).await
}

/// `PUT` through the process-wide client.
pub async fn put(endpoint: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
    default_client()?.put(endpoint, options).await
}

/// `DELETE` through the process-wide client.
pub async fn delete(endpoint: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
    default_client()?.delete(endpoint, options).await
}

/// `PATCH` through the process-wide client.
pub async fn patch(endpoint: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
    default_client()?.patch(endpoint, options).await
}
