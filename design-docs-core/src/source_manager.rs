//! Resolves a logical documentation path against every enabled source, merges the
//! results by priority and caches the merged document.
//!
//! # Resolution
//! 1. A valid cache entry short-circuits everything (no network activity).
//! 2. Enabled sources are fetched concurrently; each fetch is independent.
//! 3. Per-source failures are logged and dropped. Only when no source produced content
//!    is the result absent.
//! 4. The merged result is cached (when caching is enabled) and returned.
//!
//! # Merge policy
//! Results are ordered ascending by priority. The highest-priority result supplies the
//! body and the attribution; frontmatter fields are layered from lowest to highest
//! priority, so unique low-priority fields survive. `overrides` names the lowest-priority
//! contributor whenever more than one source contributed.
//!
//! # Concurrency
//! The cache lock is never held across an await. Concurrent resolves of the same path are
//! not deduplicated; the last one to finish wins the cache slot.

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{Config, DocumentationSource, SourceName};
use crate::contract::ContentFetcher;
use crate::error::ConfigError;
use crate::markdown::{self, ParsedContent};

/// A resolved document, as returned to callers and stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcedContent {
    pub body: String,
    pub frontmatter: BTreeMap<String, String>,
    pub source: SourceName,
    /// The lowest-priority source whose content was superseded, if any.
    pub overrides: Option<SourceName>,
    pub last_updated: String,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub name: SourceName,
    pub enabled: bool,
    pub priority: u32,
    pub auth_required: bool,
    pub last_sync: Option<String>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    content: SourcedContent,
    fetched_at: Instant,
}

pub struct SourceManager<F> {
    sources: Vec<DocumentationSource>,
    refresh_interval: Duration,
    cache_enabled: bool,
    fetcher: F,
    cache: RwLock<HashMap<String, CacheEntry>>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
}

impl<F: ContentFetcher> SourceManager<F> {
    /// Validates `config` and builds a manager around it.
    ///
    /// The source list is copied; later changes to `config` are not observed.
    pub fn new(config: &Config, fetcher: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sources: config.sources.clone(),
            refresh_interval: Duration::from_secs(config.refresh_interval_secs),
            cache_enabled: config.cache_enabled,
            fetcher,
            cache: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
        })
    }

    pub async fn resolve(&self, file_path: &str) -> Option<SourcedContent> {
        if let Some(hit) = self.cached(file_path) {
            debug!(file_path, source = %hit.source, "Serving document from cache");
            return Some(hit);
        }

        let sources = self.enabled_sources();
        let fetches = sources.iter().map(|source| async move {
            (*source, self.fetcher.fetch(source, file_path).await)
        });

        let mut results = Vec::new();
        for (source, outcome) in join_all(fetches).await {
            match outcome {
                Ok(Some(raw)) => {
                    debug!(file_path, source = %source.name, "Source provided document");
                    results.push((source.priority, markdown::parse(&raw, source.name)));
                }
                Ok(None) => {
                    debug!(file_path, source = %source.name, "Document not found in source");
                }
                Err(e) => {
                    warn!(
                        file_path,
                        source = %source.name,
                        auth_failure = e.is_auth_failure(),
                        error = %e,
                        "Failed to fetch from source"
                    );
                }
            }
        }

        let Some(content) = merge(results, file_path, Utc::now()) else {
            info!(file_path, "Document not found in any enabled source");
            return None;
        };

        info!(
            file_path,
            source = %content.source,
            overrides = ?content.overrides,
            "Resolved document"
        );
        if self.cache_enabled {
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(
                    file_path.to_string(),
                    CacheEntry {
                        content: content.clone(),
                        fetched_at: Instant::now(),
                    },
                );
        }
        Some(content)
    }

    fn cached(&self, file_path: &str) -> Option<SourcedContent> {
        if !self.cache_enabled {
            return None;
        }
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let hit = cache
            .get(file_path)
            .filter(|entry| entry.fetched_at.elapsed() < self.refresh_interval)
            .map(|entry| entry.content.clone());
        hit
    }

    /// Enabled sources, ascending by priority. Every operation selects sources through here.
    pub fn enabled_sources(&self) -> Vec<&DocumentationSource> {
        let mut enabled: Vec<&DocumentationSource> =
            self.sources.iter().filter(|s| s.enabled).collect();
        enabled.sort_by_key(|s| s.priority);
        enabled
    }

    pub fn source_status(&self) -> Vec<SourceStatus> {
        let last_refresh = *self
            .last_refresh
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let last_sync = last_refresh.map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true));
        self.sources
            .iter()
            .map(|source| SourceStatus {
                name: source.name,
                enabled: source.enabled,
                priority: source.priority,
                auth_required: source.auth_required,
                last_sync: last_sync.clone(),
            })
            .collect()
    }

    /// Drops every cached document. The next resolve of any path fetches again.
    pub fn refresh(&self) {
        let cleared = {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            let n = cache.len();
            cache.clear();
            n
        };
        *self
            .last_refresh
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
        info!(cleared, "Documentation cache cleared");
    }

    pub fn cached_paths(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn sources(&self) -> &[DocumentationSource] {
        &self.sources
    }
}

/// Merges per-source results, each tagged with its source priority.
///
/// Returns `None` when `results` is empty.
pub fn merge(
    mut results: Vec<(u32, ParsedContent)>,
    file_path: &str,
    resolved_at: DateTime<Utc>,
) -> Option<SourcedContent> {
    results.sort_by_key(|(priority, _)| *priority);

    let overrides = match results.as_slice() {
        [(_, lowest), _, ..] => Some(lowest.origin_source),
        _ => None,
    };

    let mut frontmatter = BTreeMap::new();
    for (_, parsed) in &results {
        frontmatter.extend(
            parsed
                .frontmatter
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    let (_, primary) = results.pop()?;
    let last_updated = primary
        .last_updated
        .unwrap_or_else(|| resolved_at.to_rfc3339_opts(SecondsFormat::Millis, true));

    Some(SourcedContent {
        body: primary.body,
        frontmatter,
        source: primary.origin_source,
        overrides,
        last_updated,
        file_path: file_path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parsed(source: SourceName, raw: &str) -> ParsedContent {
        markdown::parse(raw, source)
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn merge_of_nothing_is_absent() {
        assert_eq!(merge(vec![], "a.md", at()), None);
    }

    #[test]
    fn single_result_has_no_override_and_uses_resolution_time() {
        let merged = merge(
            vec![(1, parsed(SourceName::Public, "body"))],
            "components/cards.md",
            at(),
        )
        .unwrap();
        assert_eq!(merged.source, SourceName::Public);
        assert_eq!(merged.overrides, None);
        assert_eq!(merged.body, "body");
        assert_eq!(merged.last_updated, "2024-01-02T03:04:05.000Z");
        assert_eq!(merged.file_path, "components/cards.md");
    }

    #[test]
    fn highest_priority_wins_regardless_of_input_order() {
        let merged = merge(
            vec![
                (
                    2,
                    parsed(SourceName::Internal, "---\nstatus: final\n---\ninternal"),
                ),
                (
                    1,
                    parsed(
                        SourceName::Public,
                        "---\nstatus: draft\nowner: x\nlast_updated: 2023-01-01\n---\npublic",
                    ),
                ),
            ],
            "a.md",
            at(),
        )
        .unwrap();
        assert_eq!(merged.source, SourceName::Internal);
        assert_eq!(merged.overrides, Some(SourceName::Public));
        assert_eq!(merged.body, "internal");
        assert_eq!(
            merged.frontmatter,
            BTreeMap::from([
                ("last_updated".to_string(), "2023-01-01".to_string()),
                ("owner".to_string(), "x".to_string()),
                ("status".to_string(), "final".to_string()),
            ])
        );
        // Only the authoritative source's own timestamp counts.
        assert_eq!(merged.last_updated, "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn authoritative_last_updated_is_kept() {
        let merged = merge(
            vec![(
                5,
                parsed(SourceName::Internal, "---\nlast_updated: 2024-06-01\n---\nx"),
            )],
            "a.md",
            at(),
        )
        .unwrap();
        assert_eq!(merged.last_updated, "2024-06-01");
    }
}
