use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DocumentationSource;
use crate::contract::{ContentFetcher, CredentialKind, CredentialSupplier};
use crate::error::FetchError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Fetches files through the GitHub repository contents API.
pub struct GitHubFetcher {
    client: Client,
    api_base: String,
    credentials: Arc<dyn CredentialSupplier>,
}

impl GitHubFetcher {
    pub fn new(credentials: Arc<dyn CredentialSupplier>) -> Result<Self, FetchError> {
        Self::with_api_base(GITHUB_API_BASE, credentials)
    }

    /// Points the fetcher at another API root (GitHub Enterprise, or a mock server in tests).
    pub fn with_api_base(
        api_base: impl Into<String>,
        credentials: Arc<dyn CredentialSupplier>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("design-docs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            api_base,
            credentials,
        })
    }

    fn contents_url(&self, owner: &str, repo: &str, file_path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            owner,
            repo,
            file_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: Option<String>,
    encoding: Option<String>,
}

#[async_trait]
impl ContentFetcher for GitHubFetcher {
    async fn fetch(
        &self,
        source: &DocumentationSource,
        file_path: &str,
    ) -> Result<Option<String>, FetchError> {
        let (owner, repo) = parse_repo_locator(&source.repo)?;
        let url = self.contents_url(&owner, &repo, file_path);

        let mut request = self.client.get(&url).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(branch) = &source.branch {
            request = request.query(&[("ref", branch.as_str())]);
        }
        if source.auth_required {
            let kind = CredentialKind::for_source(source);
            match self.credentials.token(kind) {
                Some(token) => {
                    request = request.header(AUTHORIZATION, format!("token {token}"));
                }
                None => {
                    warn!(
                        source = %source.name,
                        variable = kind.variable(),
                        "Source requires authentication but no token is set; attempting unauthenticated"
                    );
                }
            }
        }

        debug!(source = %source.name, url = %url, "Fetching document");
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(source = %source.name, url = %url, "Document not present in source");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let text = decode_envelope(&body).map_err(|reason| FetchError::Decode {
            url: url.clone(),
            reason,
        })?;
        debug!(source = %source.name, url = %url, bytes = text.len(), "Fetched document");
        Ok(Some(text))
    }
}

fn decode_envelope(body: &str) -> Result<String, String> {
    let envelope: ContentEnvelope =
        serde_json::from_str(body).map_err(|e| format!("unexpected response body: {e}"))?;
    if let Some(encoding) = envelope.encoding.as_deref() {
        if encoding != "base64" {
            return Err(format!("unsupported content encoding '{encoding}'"));
        }
    }
    let content = envelope
        .content
        .ok_or_else(|| "response has no content field".to_string())?;
    // GitHub wraps base64 payloads at 60 columns.
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| format!("invalid base64: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("content is not UTF-8: {e}"))
}

fn locator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:https?://|ssh://git@|git@)?(?:www\.)?github\.com[/:]([^/\s]+)/([^/\s]+?)(?:\.git)?/?$",
        )
        .expect("repository locator pattern is valid")
    })
}

/// Splits a GitHub repository locator into `(owner, repo)`.
pub fn parse_repo_locator(locator: &str) -> Result<(String, String), FetchError> {
    let caps = locator_regex()
        .captures(locator.trim())
        .ok_or_else(|| FetchError::InvalidLocator(locator.to_string()))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}
