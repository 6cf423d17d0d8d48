//! Error Handling Module
//!
//! This module provides the error type shared by every request helper:
//! - Core error types (`ApiError`, `ErrorCategory`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust
//! use api_utils::error::{ApiError, ErrorCategory};
//! use api_utils::ResponseBody;
//!
//! let error = ApiError::status(404, "Not Found", ResponseBody::Text(String::new()));
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert_eq!(error.status_code(), Some(404));
//! ```

mod conversions;
pub mod types;

pub use types::*;
