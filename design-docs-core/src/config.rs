use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_PUBLIC_REPO: &str = "https://github.com/appian-design/aurora.git";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Identifies one of the two documentation repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceName {
    Public,
    Internal,
}

impl SourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Public => "public",
            SourceName::Internal => "internal",
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remotely hosted documentation repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationSource {
    pub name: SourceName,
    pub enabled: bool,
    /// Repository locator, e.g. `https://github.com/owner/repo.git`.
    pub repo: String,
    /// Branch to read from; the repository default branch when unset.
    pub branch: Option<String>,
    /// Higher values win when several sources provide the same path.
    pub priority: u32,
    pub auth_required: bool,
}

impl DocumentationSource {
    pub fn public(repo: impl Into<String>) -> Self {
        Self {
            name: SourceName::Public,
            enabled: true,
            repo: repo.into(),
            branch: None,
            priority: 1,
            auth_required: false,
        }
    }

    pub fn internal(repo: impl Into<String>) -> Self {
        Self {
            name: SourceName::Internal,
            enabled: true,
            repo: repo.into(),
            branch: None,
            priority: 2,
            auth_required: true,
        }
    }
}

/// Validated settings handed to the source manager at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub sources: Vec<DocumentationSource>,
    pub refresh_interval_secs: u64,
    pub cache_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![DocumentationSource::public(DEFAULT_PUBLIC_REPO)],
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            cache_enabled: true,
        }
    }
}

impl Config {
    pub fn source(&self, name: SourceName) -> Option<&DocumentationSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Checks the invariants the source manager relies on for priority ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if !names.insert(source.name) {
                return Err(ConfigError::DuplicateSource { name: source.name });
            }
            if source.priority == 0 {
                return Err(ConfigError::InvalidPriority { name: source.name });
            }
            if let Err(e) = url::Url::parse(&source.repo) {
                return Err(ConfigError::InvalidRepo {
                    name: source.name,
                    repo: source.repo.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let enabled: Vec<&DocumentationSource> =
            self.sources.iter().filter(|s| s.enabled).collect();
        for (i, a) in enabled.iter().enumerate() {
            if let Some(b) = enabled[i + 1..].iter().find(|b| b.priority == a.priority) {
                return Err(ConfigError::DuplicatePriority {
                    priority: a.priority,
                    first: a.name,
                    second: b.name,
                });
            }
        }

        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            sources_count = self.sources.len(),
            enabled_count = self.sources.iter().filter(|s| s.enabled).count(),
            refresh_interval_secs = self.refresh_interval_secs,
            cache_enabled = self.cache_enabled,
            "Loaded Config"
        );
        for source in &self.sources {
            info!(
                source = %source.name,
                enabled = source.enabled,
                priority = source.priority,
                auth_required = source.auth_required,
                repo = %source.repo,
                "Loaded documentation source"
            );
        }
        debug!(?self, "Config loaded (full debug)");
    }
}
