//! Core error types.

use crate::response::ResponseBody;
use thiserror::Error;

/// Coarse grouping of errors, mostly useful for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request could not be built from the given options.
    Configuration,
    /// Network-level failure (connect, TLS, timeout, redirect loop).
    Network,
    /// The server answered with a 4xx status.
    Client,
    /// The server answered with a 5xx status.
    Server,
    /// A non-2xx status outside the 4xx/5xx range (e.g. an unfollowed 3xx).
    Other,
    /// The response body could not be decoded into the requested type.
    Parse,
}

/// Errors returned by the request helpers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid options, headers or client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Both `body` and `form_data` were supplied.
    #[error("Cannot set multiple body types. Use either body or formData params")]
    MultipleBodies,

    /// The endpoint is not a valid absolute URL after base-url resolution.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Transport failure reported by the HTTP client.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded its timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// A redirect was received while the redirect mode is `error`,
    /// or the redirect limit was exceeded.
    #[error("Redirect error: {0}")]
    Redirect(String),

    /// A `same-origin` request targeted a different origin.
    #[error("Request to '{url}' violates same-origin mode (origin {origin})")]
    ModeViolation { url: String, origin: String },

    /// The server answered with a non-2xx status. The body is parsed the same
    /// way a successful body would be, so JSON error payloads survive.
    #[error("HTTP status {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        body: ResponseBody,
    },

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Build a [`ApiError::Status`].
    pub fn status(status: u16, status_text: impl Into<String>, body: ResponseBody) -> Self {
        Self::Status {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// HTTP status code, for errors that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body, for status errors.
    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Consume the error and return its parsed body, if any.
    pub fn into_body(self) -> Option<ResponseBody> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_)
            | Self::MultipleBodies
            | Self::InvalidUrl { .. }
            | Self::Serialization(_)
            | Self::ModeViolation { .. } => ErrorCategory::Configuration,
            Self::Http(_) | Self::Timeout(_) | Self::Redirect(_) => ErrorCategory::Network,
            Self::Parse(_) => ErrorCategory::Parse,
            Self::Status { status, .. } => match status {
                400..=499 => ErrorCategory::Client,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Other,
            },
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.category() == ErrorCategory::Server
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
