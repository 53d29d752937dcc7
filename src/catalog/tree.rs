use tokio_util::sync::CancellationToken;

use super::entry::CatalogEntry;
use crate::error::NetworkError;
use crate::feed::CatalogProvider;

/// How a load step ended when it did not fail outright.
///
/// `Interrupted` means the cancellation token fired before the provider ran
/// out of pages; whatever was fetched so far stays in the unconfirmed set
/// for the reconciler to decide over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCompletion {
    Complete,
    Interrupted,
}

/// Everything a tree needs to drive one load attempt.
pub struct LoadContext<'a> {
    pub provider: &'a dyn CatalogProvider,
    pub token: CancellationToken,
    pub page_size: usize,
}

/// The catalog tree surface the load protocol works against.
///
/// The async methods are the fetch side; the sync methods are the
/// reconciliation side and must never fail — the reconciler runs them as the
/// unconditional final step of every load attempt.
#[async_trait::async_trait]
pub trait CatalogTree: Send + Sync {
    /// Start a fresh fetch of this node's children, accumulating pages into
    /// the unconfirmed set from scratch.
    async fn load_children(&self, ctx: &LoadContext<'_>) -> Result<LoadCompletion, NetworkError>;

    /// Continue a previously interrupted fetch from its last known position,
    /// appending newly fetched children to the unconfirmed set.
    async fn resume_loading(&self, ctx: &LoadContext<'_>) -> Result<LoadCompletion, NetworkError>;

    /// Whether partial progress on this node is worth keeping across an
    /// interruption.
    fn supports_resume_loading(&self) -> bool;

    /// Discard the node's catalog content entirely, confirmed and
    /// unconfirmed alike, and forget any resume position.
    fn clear_catalog(&self);

    /// Promote the current cycle's unconfirmed children to confirmed and
    /// drop stale entries that were not reconfirmed this cycle.
    fn remove_unconfirmed_items(&self);

    /// Stamp the node with the current time as its last successful load.
    fn update_loaded_time(&self);

    /// Snapshot of the confirmed children.
    fn sub_trees(&self) -> Vec<CatalogEntry>;
}
