//! Error types for configuration validation and per-source fetching.
//!
//! Two families exist and they are handled very differently:
//!
//! - [`ConfigError`] is fatal. A source list that fails validation cannot be trusted for
//!   priority ordering, so [`SourceManager::new`](crate::source_manager::SourceManager::new)
//!   refuses to build.
//! - [`FetchError`] is local to one source and one path. The source manager logs it and
//!   carries on with the remaining sources.
//!
//! "Not found" is not an error anywhere in this crate; fetchers report it as `Ok(None)`.

use thiserror::Error;

use crate::config::SourceName;

/// Invalid or incomplete configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no documentation sources configured")]
    NoSources,

    #[error("source '{name}' has priority 0; priorities must be positive")]
    InvalidPriority { name: SourceName },

    #[error("sources '{first}' and '{second}' are both enabled with priority {priority}")]
    DuplicatePriority {
        priority: u32,
        first: SourceName,
        second: SourceName,
    },

    #[error("source '{name}' is configured more than once")]
    DuplicateSource { name: SourceName },

    #[error("source '{name}' has an invalid repository URL '{repo}': {reason}")]
    InvalidRepo {
        name: SourceName,
        repo: String,
        reason: String,
    },

    #[error("refresh interval must be positive")]
    InvalidRefreshInterval,

    #[error("authentication required for source '{name}' but {variable} not provided")]
    MissingCredential {
        name: SourceName,
        variable: &'static str,
    },
}

/// Failure to fetch one path from one source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The repository locator does not name a GitHub owner/repository pair.
    #[error("invalid GitHub repository URL: {0}")]
    InvalidLocator(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-success status other than 404.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response envelope or its base64 payload could not be decoded.
    #[error("failed to decode content from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// Whether the failure looks like a credential problem (401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, FetchError::Status { status: 401 | 403, .. })
    }
}
