/// `load_config` module: builds the validated core [`Config`] from an optional YAML file
/// plus environment overrides.
///
/// This is the only place where configuration files and environment variables are read.
/// The core crate receives a finished `Config` value and never looks at the environment
/// for settings.
///
/// # Precedence
/// built-in defaults < YAML file < environment variables.
///
/// # Environment
/// - `GITHUB_OWNER` + `GITHUB_REPO`: public repository locator.
/// - `GITHUB_TOKEN` (non-empty): marks the public source as authenticated.
/// - `ENABLE_INTERNAL_DOCS=true`: adds the internal source, located by
///   `INTERNAL_GITHUB_OWNER` (or `GITHUB_OWNER`) and `INTERNAL_GITHUB_REPO`.
/// - `DOCS_REFRESH_INTERVAL`: cache lifetime in seconds.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use design_docs_core::config::{Config, DocumentationSource, SourceName};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
const DEFAULT_INTERNAL_REPO_NAME: &str = "design-system-docs-internal";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    documentation: RawDocumentation,
    refresh_interval: Option<u64>,
    cache_enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocumentation {
    sources: RawSources,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSources {
    public: Option<RawSource>,
    internal: Option<RawSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSource {
    enabled: Option<bool>,
    repo: Option<String>,
    branch: Option<String>,
    priority: Option<u32>,
    auth_required: Option<bool>,
}

impl RawSource {
    fn apply_to(self, source: &mut DocumentationSource) {
        if let Some(enabled) = self.enabled {
            source.enabled = enabled;
        }
        if let Some(repo) = self.repo {
            source.repo = repo;
        }
        if self.branch.is_some() {
            source.branch = self.branch;
        }
        if let Some(priority) = self.priority {
            source.priority = priority;
        }
        if let Some(auth_required) = self.auth_required {
            source.auth_required = auth_required;
        }
    }
}

/// Loads configuration from `path`, or from `./config.yml` when no path is given and that
/// file exists, then applies process environment overrides and validates the result.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path: Option<PathBuf> = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    let mut config = match &path {
        Some(path_ref) => {
            info!(config_path = ?path_ref, "Loading configuration from file");
            let content = fs::read_to_string(path_ref).map_err(|e| {
                error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
                anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
            })?;
            parse_config_str(&content)
                .with_context(|| format!("Invalid config file {}", path_ref.display()))?
        }
        None => {
            info!("No config file found, using built-in defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    config
        .validate()
        .context("Configuration validation failed")?;
    config.trace_loaded();
    Ok(config)
}

/// Parses YAML on top of the built-in defaults. Does not validate.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let raw: RawConfig = match serde_yaml::from_str::<Option<RawConfig>>(content) {
        Ok(conf) => conf.unwrap_or_default(),
        Err(e) => {
            error!(error = ?e, "Failed to parse config YAML");
            bail!("Failed to parse config YAML: {e}");
        }
    };

    let mut config = Config::default();
    if let Some(refresh_interval) = raw.refresh_interval {
        config.refresh_interval_secs = refresh_interval;
    }
    if let Some(cache_enabled) = raw.cache_enabled {
        config.cache_enabled = cache_enabled;
    }

    let sources = raw.documentation.sources;
    if let Some(public) = sources.public {
        public.apply_to(public_source(&mut config));
    }
    if let Some(internal) = sources.internal {
        if internal.repo.is_none() {
            bail!("documentation.sources.internal.repo is required");
        }
        let mut source = DocumentationSource::internal(String::new());
        internal.apply_to(&mut source);
        config.sources.push(source);
    }
    Ok(config)
}

/// Applies the documented environment overrides, reading variables through `env`.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<E>(config: &mut Config, env: E) -> Result<()>
where
    E: Fn(&str) -> Option<String>,
{
    let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let owner = var("GITHUB_OWNER");
    if let (Some(owner), Some(repo)) = (&owner, var("GITHUB_REPO")) {
        let locator = github_locator(owner, &repo);
        info!(repo = %locator, "Public repository set from environment");
        public_source(config).repo = locator;
    }

    if var("GITHUB_TOKEN").is_some() {
        public_source(config).auth_required = true;
    }

    if var("ENABLE_INTERNAL_DOCS").as_deref() == Some("true") {
        let Some(internal_owner) = var("INTERNAL_GITHUB_OWNER").or(owner) else {
            error!("ENABLE_INTERNAL_DOCS is set but no repository owner is configured");
            bail!("ENABLE_INTERNAL_DOCS requires INTERNAL_GITHUB_OWNER or GITHUB_OWNER");
        };
        let internal_repo =
            var("INTERNAL_GITHUB_REPO").unwrap_or_else(|| DEFAULT_INTERNAL_REPO_NAME.to_string());
        let source = DocumentationSource::internal(github_locator(&internal_owner, &internal_repo));
        info!(repo = %source.repo, "Internal documentation enabled from environment");
        config.sources.retain(|s| s.name != SourceName::Internal);
        config.sources.push(source);
    }

    if let Some(raw) = var("DOCS_REFRESH_INTERVAL") {
        match raw.trim().parse::<u64>() {
            Ok(secs) => config.refresh_interval_secs = secs,
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring unparseable DOCS_REFRESH_INTERVAL");
            }
        }
    }
    Ok(())
}

fn github_locator(owner: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}.git", owner.trim(), repo.trim())
}

/// The public source, re-created from defaults if a caller removed it.
fn public_source(config: &mut Config) -> &mut DocumentationSource {
    let index = match config
        .sources
        .iter()
        .position(|s| s.name == SourceName::Public)
    {
        Some(index) => index,
        None => {
            config.sources.insert(
                0,
                DocumentationSource::public(design_docs_core::config::DEFAULT_PUBLIC_REPO),
            );
            0
        }
    };
    &mut config.sources[index]
}
