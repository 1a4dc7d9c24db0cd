//! API and SDK versions
//!
//! The REST API is versioned in its path (`.../api/v1/`). The SDK speaks one
//! major API version, [`API_VERSION`], and refuses base URLs that name another
//! one. Base URLs without a version segment (proxies, test servers) are
//! accepted as is.
//!
//! ## Example
//!
//! ```rust
//! use deepint_sdk::version::{API_VERSION, Version, check_base_url};
//!
//! assert_eq!(Version::parse("1.0.0").unwrap(), API_VERSION);
//! assert!(check_base_url("https://app.deepint.net/api/v1/").is_ok());
//! assert!(check_base_url("https://app.deepint.net/api/v2/").is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// REST API version this SDK is written against
pub const API_VERSION: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
};

/// Version of this crate
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A semantic version (MAJOR.MINOR.PATCH)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse "MAJOR.MINOR.PATCH"; "MAJOR" and "MAJOR.MINOR" fill the rest with 0
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        s.parse()
    }

    pub const fn major(&self) -> u32 {
        self.major
    }

    pub const fn minor(&self) -> u32 {
        self.minor
    }

    pub const fn patch(&self) -> u32 {
        self.patch
    }

    /// Same major version, at least as new as `required`
    pub const fn is_compatible_with(&self, required: &Version) -> bool {
        if self.major != required.major {
            return false;
        }
        if self.minor != required.minor {
            return self.minor > required.minor;
        }
        self.patch >= required.patch
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let component = |index: usize, name: &str| -> Result<u32, VersionError> {
            match parts.get(index) {
                None => Ok(0),
                Some(raw) => raw
                    .parse()
                    .map_err(|_| VersionError::InvalidComponent(name.to_string(), raw.to_string())),
            }
        };

        Ok(Version {
            major: component(0, "major")?,
            minor: component(1, "minor")?,
            patch: component(2, "patch")?,
        })
    }
}

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Invalid version format: {0} (expected MAJOR.MINOR.PATCH)")]
    InvalidFormat(String),

    #[error("Invalid {0} component: {1}")]
    InvalidComponent(String, String),

    /// The base URL points at an API version this SDK does not speak
    #[error("Base URL targets API v{requested}, this SDK speaks v{supported}")]
    Incompatible { requested: u32, supported: u32 },
}

/// Major API version named by a base URL's `api/v{N}` segment, if any
pub fn api_version_of(base_url: &str) -> Option<u32> {
    let mut segments = base_url.split('/').filter(|s| !s.is_empty());
    segments.by_ref().find(|s| *s == "api")?;
    segments
        .next()?
        .strip_prefix('v')
        .and_then(|n| n.parse().ok())
}

/// Reject base URLs naming an API version other than [`API_VERSION`]'s major
pub fn check_base_url(base_url: &str) -> Result<(), VersionError> {
    match api_version_of(base_url) {
        Some(requested) if requested != API_VERSION.major => Err(VersionError::Incompatible {
            requested,
            supported: API_VERSION.major,
        }),
        _ => Ok(()),
    }
}

/// `User-Agent` sent with every request
pub fn user_agent() -> String {
    format!("deepint-rs/{}", SDK_VERSION)
}

/// Version details for CLI output
pub fn version_info() -> String {
    format!(
        "Deep Intelligence SDK v{}\nREST API: v{}",
        SDK_VERSION, API_VERSION.major
    )
}
