//! CLI entry point for the mediacache tool.

use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::StreamExt;
use futures_util::stream;
use mediacache_core::download::BYTES_PER_MIB;
use mediacache_core::{
    Blacklist, CachePolicy, Downloader, DownloaderConfig, PostsPage, build_cache,
};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries only the resulting paths.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let urls = collect_urls(&args)?;
    if urls.is_empty() {
        info!("No input provided. Pass URLs as arguments, via stdin, or with --posts.");
        return Ok(ExitCode::SUCCESS);
    }

    let policy = match &args.cache_dir {
        Some(dir) => CachePolicy::Directory(dir.clone()),
        None => CachePolicy::Ephemeral,
    };
    let cache = build_cache(&policy, &args.host)
        .await
        .with_context(|| format!("Failed to set up cache ({policy})"))?;
    info!(cache = %cache, urls = urls.len(), "Fetching");

    let config = DownloaderConfig::default().with_max_bytes(args.max_size_mb * BYTES_PER_MIB);
    let downloader = Downloader::new(cache, config)?;

    let mut results = stream::iter(urls)
        .map(|url| {
            let downloader = downloader.clone();
            async move {
                let result = downloader.fetch(&url).await;
                (url, result)
            }
        })
        .buffer_unordered(usize::from(args.concurrency));

    let mut completed = 0usize;
    let mut failed = 0usize;
    while let Some((url, result)) = results.next().await {
        match result {
            Ok(path) => {
                completed += 1;
                println!("{}", path.display());
            }
            Err(error) => {
                failed += 1;
                debug!(url = %url, error = %error, "skipping failed URL");
            }
        }
    }

    info!(completed, failed, "Fetch complete");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Gathers URLs from positional args (or stdin) plus the optional posts file.
fn collect_urls(args: &Args) -> Result<Vec<String>> {
    let mut urls: Vec<String> = args.urls.clone();

    if let Some(posts_path) = &args.posts {
        let raw = std::fs::read_to_string(posts_path)
            .with_context(|| format!("Failed to read posts file '{}'", posts_path.display()))?;
        let page: PostsPage = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse posts file '{}'", posts_path.display()))?;
        let blacklist = Blacklist::from_lines(&args.blacklist);

        let selected = page.download_urls(&blacklist, &args.host);
        let skipped = page.posts.len() - selected.len();
        if skipped > 0 {
            warn!(skipped, "Skipped blacklisted posts or posts without a file URL");
        }
        urls.extend(selected);
    } else if urls.is_empty() && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        urls.extend(
            buffer
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(urls)
}
