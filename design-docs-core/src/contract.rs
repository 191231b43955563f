//! # contract: seams between the source manager and the outside world
//!
//! The source manager never talks to the network or the environment directly. It goes
//! through two small traits defined here:
//!
//! - [`ContentFetcher`] retrieves the raw text stored at a path in one source.
//! - [`CredentialSupplier`] hands out tokens for sources that declare `auth_required`.
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall`. The generated `MockContentFetcher` and
//! `MockCredentialSupplier` are exported under the default `test-export-mocks` feature so
//! integration tests in `tests/` can script per-source responses.

use async_trait::async_trait;
use mockall::automock;

use crate::config::DocumentationSource;
use crate::error::FetchError;

/// Retrieves raw document text from a single documentation source.
///
/// Outcomes:
/// - `Ok(Some(text))`: the path exists at this source.
/// - `Ok(None)`: the path does not exist at this source. This is expected and not an error.
/// - `Err(_)`: transport, authentication, locator or payload failure.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(
        &self,
        source: &DocumentationSource,
        file_path: &str,
    ) -> Result<Option<String>, FetchError>;
}

/// Which named token a source authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// The lowest-priority (public) source.
    Primary,
    /// Any higher-priority source.
    Secondary,
}

impl CredentialKind {
    pub fn for_source(source: &DocumentationSource) -> Self {
        if source.priority > 1 {
            CredentialKind::Secondary
        } else {
            CredentialKind::Primary
        }
    }

    /// Environment variable conventionally holding this token.
    pub fn variable(&self) -> &'static str {
        match self {
            CredentialKind::Primary => "GITHUB_TOKEN",
            CredentialKind::Secondary => "INTERNAL_DOCS_TOKEN",
        }
    }
}

/// Supplies bearer tokens for authenticated sources.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait CredentialSupplier: Send + Sync {
    fn token(&self, kind: CredentialKind) -> Option<String>;
}
