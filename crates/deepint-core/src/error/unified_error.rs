//! UnifiedError trait implementation for DeepintError

use super::types::{DeepintError, UnifiedError};

impl UnifiedError for DeepintError {
    fn error_code(&self) -> &str {
        match self {
            Self::Validation { .. } => "DEEPINT_VALIDATION",
            Self::NotFound { .. } => "DEEPINT_NOT_FOUND",
            Self::Transport { .. } => "DEEPINT_TRANSPORT",
            Self::TaskFailed { .. } => "DEEPINT_TASK_FAILED",
            Self::Timeout { .. } => "DEEPINT_TIMEOUT",
            Self::InvalidState { .. } => "DEEPINT_INVALID_STATE",
            Self::InvalidInput { .. } => "DEEPINT_INVALID_INPUT",
            Self::Config { .. } => "DEEPINT_CONFIG",
            Self::Json { .. } => "DEEPINT_JSON",
            Self::Io { .. } => "DEEPINT_IO",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } => message,
            Self::NotFound { message, .. } => message,
            Self::Transport { message, .. } => message,
            Self::TaskFailed { message, .. } => message,
            Self::Timeout { .. } => "Task resolution timed out",
            Self::InvalidState { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::Io { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Validation { context, .. } => context.as_deref(),
            Self::NotFound { context, .. } => context.as_deref(),
            Self::Transport { context, .. } => context.as_deref(),
            Self::TaskFailed { context, .. } => context.as_deref(),
            Self::Timeout { context, .. } => context.as_deref(),
            Self::InvalidState { context, .. } => context.as_deref(),
            Self::InvalidInput { context, .. } => context.as_deref(),
            Self::Config { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
