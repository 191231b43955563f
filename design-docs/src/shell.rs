//! Line-oriented command loop.
//!
//! Every line is parsed with the same grammar as the CLI subcommands, so `details
//! components cards` in the shell behaves like `design-docs details components cards`.
//! All lines share one [`DocsService`], which makes caching and `refresh` observable.

use anyhow::Result;
use clap::Parser;
use design_docs_core::contract::ContentFetcher;
use design_docs_core::dispatch::DocsService;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::cli::{execute, Commands};

#[derive(Parser, Debug)]
#[clap(name = "design-docs", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[clap(subcommand)]
    command: Commands,
}

/// Reads commands from `input` until end of input or `exit`/`quit`, writing each result
/// to `output` followed by a blank line.
pub async fn run_shell<F, R, W>(service: &DocsService<F>, input: R, mut output: W) -> Result<()>
where
    F: ContentFetcher,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            tracing::info!("Shell exit requested");
            break;
        }

        let text = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => execute(service, &parsed.command).await,
            Err(e) => e.to_string().trim_end().to_string(),
        };
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n\n").await?;
        output.flush().await?;
    }
    Ok(())
}
