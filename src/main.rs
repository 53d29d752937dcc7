//! netshelf — resumable loader for remote tree-structured content catalogs.
//!
//! Fetches a catalog listing page-by-page with a pre-flight session check,
//! keeps partial progress across interruptions where the node supports
//! resumption, and reconciles the tree exactly once per load attempt.

#![warn(clippy::all)]

mod auth;
mod catalog;
mod cli;
mod config;
mod error;
mod feed;
mod loader;
mod registry;
pub mod retry;
mod shutdown;
mod types;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use auth::{AuthenticationManager, TokenSessionManager};
use catalog::{CatalogLink, CatalogNode, CatalogTree};
use feed::{CatalogProvider, HttpCatalogProvider};
use loader::{CatalogLoadTask, LoadOutcome};
use registry::{CatalogRegistry, LoggingRegistry};

/// Load one level of sub-catalogs beneath a successfully loaded root.
///
/// Each `Catalog`-kind child with an href gets its own node and one
/// non-resumed load task. Failed or interrupted sub-loads are logged and
/// skipped; a shutdown stops the walk between tasks.
async fn expand_sub_catalogs(
    root: &CatalogNode,
    link: &Arc<CatalogLink>,
    provider: &Arc<dyn CatalogProvider>,
    registry: &Arc<dyn CatalogRegistry>,
    config: &config::Config,
    token: &CancellationToken,
) -> Vec<(String, Arc<CatalogNode>)> {
    let mut loaded = Vec::new();
    for entry in root.sub_trees() {
        if token.is_cancelled() {
            break;
        }
        let Some(href) = entry.href.as_ref().filter(|_| entry.is_catalog()) else {
            continue;
        };
        let node = Arc::new(CatalogNode::new(href.clone(), link.clone(), true));
        let task = CatalogLoadTask::new(
            node.clone(),
            link.clone(),
            provider.clone(),
            registry.clone(),
            config.check_authentication,
            false,
            config.page_size,
        );
        match task.run(token.clone()).await {
            LoadOutcome::Success => loaded.push((entry.id.clone(), node)),
            outcome => {
                tracing::warn!(catalog = %entry.title, ?outcome, "sub-catalog load did not complete");
            }
        }
    }
    loaded
}

/// Print the confirmed children of a loaded node, nesting the children of
/// any sub-catalog loaded by `expand_sub_catalogs`.
fn print_catalog(node: &CatalogNode, subs: &[(String, Arc<CatalogNode>)]) {
    let children = node.sub_trees();
    for entry in &children {
        let marker = if entry.is_catalog() { "/" } else { "" };
        println!("  {}{}", entry.title, marker);
        if let Some((_, sub)) = subs.iter().find(|(id, _)| *id == entry.id) {
            for sub_entry in sub.sub_trees() {
                let marker = if sub_entry.is_catalog() { "/" } else { "" };
                println!("    {}{}", sub_entry.title, marker);
            }
        }
    }
    println!();
    println!("{} entries", children.len());
    if let Some(loaded) = node.last_loaded() {
        println!("Loaded at {}", loaded.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let config = config::Config::from_cli(cli)?;
    tracing::info!(catalog = %config.catalog, "Starting netshelf");

    let session: Option<Arc<dyn AuthenticationManager>> = match &config.token {
        Some(token) => Some(Arc::new(TokenSessionManager::new(
            &config.catalog,
            token.clone(),
            config.timeout,
        )?)),
        None => None,
    };

    let title = config
        .catalog
        .host_str()
        .unwrap_or("catalog")
        .to_string();
    let link = Arc::new(CatalogLink::new(title, config.catalog.clone(), session));
    let provider: Arc<dyn CatalogProvider> = Arc::new(HttpCatalogProvider::new(
        config.catalog.clone(),
        config.timeout,
    )?);
    let registry: Arc<dyn CatalogRegistry> = Arc::new(LoggingRegistry);
    // Feeds speaking the offset-paged listing shape can resume by position.
    let root = Arc::new(CatalogNode::root(link.clone(), true));

    let shutdown_token = shutdown::install_signal_handler();

    let outcome = retry::run_with_reload(
        &config.reload_policy,
        &shutdown_token,
        config.resume,
        root.supports_resume_loading(),
        |resume| {
            CatalogLoadTask::new(
                root.clone(),
                link.clone(),
                provider.clone(),
                registry.clone(),
                config.check_authentication,
                resume,
                config.page_size,
            )
        },
    )
    .await;

    match outcome {
        LoadOutcome::Success => {
            let subs = if config.recurse {
                expand_sub_catalogs(&root, &link, &provider, &registry, &config, &shutdown_token)
                    .await
            } else {
                Vec::new()
            };
            print_catalog(&root, &subs);
            Ok(())
        }
        LoadOutcome::Error(message) => anyhow::bail!("catalog load failed: {message}"),
        LoadOutcome::Interrupted { error } => {
            if let Some(message) = error {
                tracing::warn!("Load interrupted after a network error: {message}");
            }
            if root.supports_resume_loading() {
                tracing::info!("Load interrupted; re-run with --resume to continue");
            } else {
                tracing::info!("Load interrupted; partial progress was discarded");
            }
            Ok(())
        }
    }
}
