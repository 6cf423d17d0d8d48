//! HTTP Interceptor interfaces
//!
//! Interceptors observe and tweak requests before they reach the transport,
//! observe responses and get notified of errors. The hooks run inline on
//! every request, so they should stay cheap.

use crate::error::ApiError;
use crate::request::FetchRequest;
use crate::response::ApiResponse;
use reqwest::Method;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    pub url: String,
}

impl RequestContext {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            request_id: generate_request_id(),
            method,
            url: url.into(),
        }
    }
}

/// Random request id attached to every context.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Return the (possibly modified)
    /// request or an error to short-circuit it.
    fn on_before_send(
        &self,
        _ctx: &RequestContext,
        request: FetchRequest,
    ) -> Result<FetchRequest, ApiError> {
        Ok(request)
    }

    /// Called after a response is received, before status mapping.
    fn on_response(&self, _ctx: &RequestContext, _response: &ApiResponse) -> Result<(), ApiError> {
        Ok(())
    }

    /// Called when sending fails or the status is mapped to an error.
    fn on_error(&self, _ctx: &RequestContext, _error: &ApiError) {}
}

/// A simple logging interceptor backed by `tracing` (no bodies or header values).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &RequestContext,
        request: FetchRequest,
    ) -> Result<FetchRequest, ApiError> {
        tracing::debug!(
            target: "api_utils::http",
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            headers = request.headers().len(),
            "sending request"
        );
        Ok(request)
    }

    fn on_response(&self, ctx: &RequestContext, response: &ApiResponse) -> Result<(), ApiError> {
        tracing::debug!(
            target: "api_utils::http",
            request_id = %ctx.request_id,
            url = %ctx.url,
            status = %response.status,
            bytes = response.body.len(),
            "response received"
        );
        Ok(())
    }

    fn on_error(&self, ctx: &RequestContext, error: &ApiError) {
        tracing::debug!(
            target: "api_utils::http",
            request_id = %ctx.request_id,
            method = %ctx.method,
            url = %ctx.url,
            err = %error,
            "request error"
        );
    }
}
