#![doc = "design-docs-core: core logic library for design-docs."]

//! This crate resolves design system documentation from one or more prioritised
//! GitHub repositories, merges the results per path and caches them in memory.
//! The CLI crate only wires configuration and user-facing commands on top of it.
//!
//! # Usage
//! Build a [`config::Config`], pick a [`contract::ContentFetcher`] (normally
//! [`fetch::GitHubFetcher`]) and hand both to [`source_manager::SourceManager::new`].
//! [`dispatch::DocsService`] renders the manager's output as text.

pub mod catalog;
pub mod config;
pub mod contract;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod markdown;
pub mod source_manager;

pub use error::{ConfigError, FetchError};
