///
/// This module implements the CLI interface for design-docs: command parsing, wiring of
/// configuration and the GitHub fetcher, and printing of command output.
///
/// All resolution, merging and caching logic lives in the [`design-docs-core`] crate.
/// This module is strictly CLI glue.
///
/// ## How To Use
/// - From the command line: `design-docs --help`.
/// - Programmatically / in integration tests: call [`run`] with a constructed [`Cli`].
///
/// ## Extending
/// Add a variant to [`Commands`] and a matching arm in [`execute`]; keep formatting in
/// `design_docs_core::dispatch`.
///
/// [`design-docs-core`]: ../../design-docs-core/
use crate::load_config::load_config;
use crate::shell::run_shell;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use design_docs_core::catalog::Catalog;
use design_docs_core::contract::ContentFetcher;
use design_docs_core::credentials::{validate_auth, EnvCredentials};
use design_docs_core::dispatch::DocsService;
use design_docs_core::fetch::GitHubFetcher;
use design_docs_core::source_manager::SourceManager;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI for design-docs: browse design system guidance merged from public and internal sources.
#[derive(Parser)]
#[clap(
    name = "design-docs",
    version,
    about = "Browse design system documentation merged from public and internal GitHub sources"
)]
pub struct Cli {
    /// Path to a YAML config file (defaults to ./config.yml when present)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List all design system categories
    Categories,
    /// List the components in a category
    Components {
        /// Design system category (components, layouts, patterns)
        category: String,
    },
    /// Show the documentation for one component
    Details {
        /// Design system category (components, layouts, patterns)
        category: String,
        /// Name of the component, layout, or pattern
        name: String,
    },
    /// Search titles and descriptions by keyword
    Search {
        /// Keyword to search for; several words are searched as one phrase
        #[clap(required = true, num_args = 1..)]
        keyword: Vec<String>,
    },
    /// Show configured documentation sources and their status
    Sources {
        /// Also check that every source requiring authentication has a token
        #[clap(long)]
        check_auth: bool,
    },
    /// Clear the documentation cache
    Refresh,
    /// Read commands from stdin, one per line, sharing one cache
    Shell,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = load_config(cli.config.as_deref())?;
    let fetcher = GitHubFetcher::new(Arc::new(EnvCredentials))
        .context("Failed to construct GitHub client")?;
    let manager =
        SourceManager::new(&config, fetcher).context("Failed to initialise source manager")?;
    let service = DocsService::new(Catalog::builtin(), manager);

    match cli.command {
        Commands::Shell => {
            tracing::info!(command = "shell", "Starting interactive shell");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_shell(&service, stdin, tokio::io::stdout()).await
        }
        command => {
            let output = execute(&service, &command).await;
            println!("{output}");
            Ok(())
        }
    }
}

/// Runs one command against `service` and returns the text to show.
pub async fn execute<F: ContentFetcher>(service: &DocsService<F>, command: &Commands) -> String {
    tracing::debug!(?command, "Executing command");
    match command {
        Commands::Categories => service.list_categories(),
        Commands::Components { category } => service.list_components(category),
        Commands::Details { category, name } => service.component_details(category, name).await,
        Commands::Search { keyword } => service.search(&keyword.join(" ")),
        Commands::Sources { check_auth } => {
            let mut output = service.sources_status();
            if *check_auth {
                match validate_auth(service.manager().sources(), &EnvCredentials) {
                    Ok(()) => output.push_str("\nAuthentication check passed."),
                    Err(e) => output.push_str(&format!("\nAuthentication check failed: {e}")),
                }
            }
            output
        }
        Commands::Refresh => service.refresh(),
        Commands::Shell => "Already running the shell.".to_string(),
    }
}
