//! API credentials

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials used to authenticate against the Deep Intelligence API.
///
/// The token is a plain value resolved once by the caller (environment, file,
/// secret manager); the SDK never looks it up on its own.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Raw token, as sent in the `x-auth-token` header
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_empty(&self) -> bool {
        self.token.trim().is_empty()
    }

    /// Display-safe version of the token
    pub fn masked(&self) -> String {
        mask_token(&self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.masked())
            .finish()
    }
}

fn mask_token(token: &str) -> String {
    let len = token.chars().count();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = token.chars().take(6).collect();
    let suffix: String = token.chars().skip(len - 4).collect();
    format!("{}{}...{}", prefix, "*".repeat((len - 10).min(8)), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_token() {
        let credentials = Credentials::new("a1b2c3d4e5f6g7h8i9j0");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("a1b2c3d4e5f6g7h8i9j0"));
        assert!(debug.contains("i9j0"));
    }

    #[test]
    fn short_tokens_are_fully_masked() {
        assert_eq!(Credentials::new("short").masked(), "*****");
    }
}
