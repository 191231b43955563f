use tracing::debug;

use crate::config::DocumentationSource;
use crate::contract::{CredentialKind, CredentialSupplier};
use crate::error::ConfigError;

/// Reads tokens from process environment variables (`GITHUB_TOKEN`, `INTERNAL_DOCS_TOKEN`).
///
/// Values are looked up on every call, so a `.env` file loaded after construction is
/// still honoured. Empty values count as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl CredentialSupplier for EnvCredentials {
    fn token(&self, kind: CredentialKind) -> Option<String> {
        let value = std::env::var(kind.variable()).ok()?;
        let value = value.trim();
        if value.is_empty() {
            debug!(variable = kind.variable(), "Credential variable set but empty");
            return None;
        }
        Some(value.to_string())
    }
}

/// Fixed tokens, for embedding callers and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticCredentials {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl CredentialSupplier for StaticCredentials {
    fn token(&self, kind: CredentialKind) -> Option<String> {
        match kind {
            CredentialKind::Primary => self.primary.clone(),
            CredentialKind::Secondary => self.secondary.clone(),
        }
    }
}

/// Fails on the first `auth_required` source with no token available.
///
/// Fetching never requires this check; unauthenticated requests are attempted anyway.
/// Callers that want auth as a precondition run it explicitly.
pub fn validate_auth<C: CredentialSupplier + ?Sized>(
    sources: &[DocumentationSource],
    credentials: &C,
) -> Result<(), ConfigError> {
    for source in sources.iter().filter(|s| s.auth_required) {
        let kind = CredentialKind::for_source(source);
        if credentials.token(kind).is_none() {
            return Err(ConfigError::MissingCredential {
                name: source.name,
                variable: kind.variable(),
            });
        }
    }
    Ok(())
}
