//! Error types for the Deep Intelligence SDK
//!
//! Every public operation either returns a value or fails with one
//! [`DeepintError`] variant. Errors coming from the transport surface unchanged;
//! the core never retries on its own.
//!
//! All errors implement the `UnifiedError` trait which provides consistent fields:
//! - error_code: A unique identifier for programmatic error handling
//! - message: Human-readable error message
//! - context: Optional additional context about where/why the error occurred

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{DeepintError, DeepintResult, ResultExt, UnifiedError};
