//! Core error types and traits

use std::time::Duration;
use thiserror::Error;

/// Result type alias for SDK operations
pub type DeepintResult<T> = Result<T, DeepintError>;

/// Unified error trait implemented by [`DeepintError`].
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is worth retrying at the transport level
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> DeepintResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> DeepintResult<T>;
}

impl<T> ResultExt<T> for DeepintResult<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> DeepintResult<T> {
        self.map_err(|e| e.with_context(context.to_string()))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> DeepintResult<T> {
        self.map_err(|e| e.with_context(f().to_string()))
    }
}

/// Main error type for the SDK
#[derive(Error, Debug, Clone)]
pub enum DeepintError {
    /// The server rejected the request parameters (HTTP 4xx other than 404)
    #[error("Validation error [{code}]: {message}")]
    Validation {
        code: String,
        message: String,
        method: Option<String>,
        url: Option<String>,
        context: Option<String>,
    },

    /// The identifier no longer resolves on the server (HTTP 404)
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        url: Option<String>,
        context: Option<String>,
    },

    /// Network failure or server error (HTTP 5xx), potentially transient
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
        context: Option<String>,
    },

    /// A server-side task reached the failed state
    #[error("Task {task_id} failed [{code}]: {message}")]
    TaskFailed {
        task_id: String,
        code: String,
        message: String,
        context: Option<String>,
    },

    /// The local polling deadline passed before the task finished
    #[error("Timed out after {}ms waiting for task", timeout.as_millis())]
    Timeout {
        timeout: Duration,
        context: Option<String>,
    },

    /// The operation is not allowed in the current state
    #[error("Invalid state: {message}")]
    InvalidState {
        message: String,
        context: Option<String>,
    },

    /// Parameters rejected before any request was sent
    #[error("Invalid input [{code}]: {message}")]
    InvalidInput {
        code: String,
        message: String,
        context: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },
}
