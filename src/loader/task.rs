use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{auth_gate, finish};
use crate::catalog::{CatalogLink, CatalogTree, LoadCompletion, LoadContext};
use crate::feed::CatalogProvider;
use crate::registry::CatalogRegistry;

/// Terminal result of one load attempt, as seen by the caller.
///
/// An interruption may carry an error message when a network failure raced
/// the cancellation. Whether to retry (re-running the task with
/// `resume = true`) is entirely the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Success,
    Error(String),
    Interrupted { error: Option<String> },
}

/// One resumable load of a catalog node's children.
///
/// Binds the authentication gate and the load step under a cancellable
/// driver and guarantees the finish reconciler runs exactly once with
/// accurate error/interruption facts, whichever phase produced them.
pub struct CatalogLoadTask<T: CatalogTree> {
    tree: Arc<T>,
    link: Arc<CatalogLink>,
    provider: Arc<dyn CatalogProvider>,
    registry: Arc<dyn CatalogRegistry>,
    check_authentication: bool,
    resume_not_load: bool,
    page_size: usize,
}

impl<T: CatalogTree> CatalogLoadTask<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tree: Arc<T>,
        link: Arc<CatalogLink>,
        provider: Arc<dyn CatalogProvider>,
        registry: Arc<dyn CatalogRegistry>,
        check_authentication: bool,
        resume_not_load: bool,
        page_size: usize,
    ) -> Self {
        Self {
            tree,
            link,
            provider,
            registry,
            check_authentication,
            resume_not_load,
            page_size,
        }
    }

    /// Drive one attempt to completion.
    ///
    /// A gate failure skips the load step and carries its message straight
    /// to reconciliation. Cancellation at any point before natural
    /// completion still reaches reconciliation, with `interrupted` set; the
    /// reconciliation itself is synchronous and cannot be cancelled.
    pub async fn run(&self, token: CancellationToken) -> LoadOutcome {
        let before = if self.check_authentication {
            auth_gate::prepare(&self.link).await
        } else {
            Ok(())
        };

        let (error_message, interrupted) = match before {
            Err(e) => (Some(e.to_string()), token.is_cancelled()),
            Ok(()) => {
                let ctx = LoadContext {
                    provider: self.provider.as_ref(),
                    token: token.clone(),
                    page_size: self.page_size,
                };
                let result = if self.resume_not_load {
                    self.tree.resume_loading(&ctx).await
                } else {
                    self.tree.load_children(&ctx).await
                };
                match result {
                    Ok(LoadCompletion::Complete) => (None, false),
                    Ok(LoadCompletion::Interrupted) => (None, true),
                    // A failure that raced the cancellation keeps both facts.
                    Err(e) => (Some(e.to_string()), token.is_cancelled()),
                }
            }
        };

        debug!(?error_message, interrupted, "load attempt finished, reconciling");
        finish::finish(
            self.tree.as_ref(),
            self.registry.as_ref(),
            error_message.as_deref(),
            interrupted,
        );

        match (error_message, interrupted) {
            (None, false) => LoadOutcome::Success,
            (Some(message), false) => LoadOutcome::Error(message),
            (error, true) => LoadOutcome::Interrupted { error },
        }
    }
}
