use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::entry::CatalogEntry;
use super::link::CatalogLink;
use super::tree::{CatalogTree, LoadCompletion, LoadContext};
use crate::error::NetworkError;

/// Which kind of load cycle is in flight. Set when a load step begins,
/// consumed by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadCycle {
    /// Children fetched this cycle replace the confirmed set wholesale.
    Fresh,
    /// Children fetched this cycle extend an earlier partial promotion.
    Resume,
}

#[derive(Default)]
struct NodeState {
    confirmed: Vec<CatalogEntry>,
    unconfirmed: Vec<CatalogEntry>,
    last_loaded: Option<DateTime<Utc>>,
    /// Next entry offset to request from the provider; the resume position.
    next_offset: u64,
    cycle: Option<LoadCycle>,
}

/// A node in the content tree.
///
/// The node is created when its parent catalog is first expanded and owned
/// by the tree owner; the load protocol only mutates its children, resume
/// position, and timestamp. All state sits behind one mutex so that
/// reconciliation appears atomic to concurrent readers — a reader never
/// observes the unconfirmed set exposed as confirmed mid-promotion.
pub struct CatalogNode {
    path: String,
    link: Arc<CatalogLink>,
    supports_resume: bool,
    state: Mutex<NodeState>,
}

impl CatalogNode {
    /// Root node of a link's catalog.
    pub fn root(link: Arc<CatalogLink>, supports_resume: bool) -> Self {
        Self::new(String::new(), link, supports_resume)
    }

    /// Node for a sub-catalog entry, addressed by its relative path.
    pub fn new(path: String, link: Arc<CatalogLink>, supports_resume: bool) -> Self {
        Self {
            path,
            link,
            supports_resume,
            state: Mutex::new(NodeState::default()),
        }
    }

    #[allow(dead_code)]
    pub fn link(&self) -> &Arc<CatalogLink> {
        &self.link
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.state().last_loaded
    }

    /// Reconciliation must never fail, so a poisoned lock is recovered
    /// rather than propagated; the state itself is kept consistent by the
    /// short critical sections below.
    fn state(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page through the provider from the current resume position, appending
    /// to the unconfirmed set. Cancellation between or during page fetches
    /// ends the walk with `Interrupted`, keeping partial progress.
    async fn fetch_pages(&self, ctx: &LoadContext<'_>) -> Result<LoadCompletion, NetworkError> {
        loop {
            if ctx.token.is_cancelled() {
                return Ok(LoadCompletion::Interrupted);
            }
            let offset = self.state().next_offset;
            let page = tokio::select! {
                res = ctx.provider.fetch_page(&self.path, offset, ctx.page_size) => res?,
                _ = ctx.token.cancelled() => return Ok(LoadCompletion::Interrupted),
            };

            let fetched = page.entries.len();
            let has_more = page.has_more;
            {
                let mut state = self.state();
                state.next_offset += fetched as u64;
                state.unconfirmed.extend(page.entries);
            }
            debug!(path = %self.path, offset, fetched, has_more, "fetched catalog page");

            // An empty page ends the walk even if the server claims more.
            if fetched == 0 || !has_more {
                return Ok(LoadCompletion::Complete);
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogTree for CatalogNode {
    async fn load_children(&self, ctx: &LoadContext<'_>) -> Result<LoadCompletion, NetworkError> {
        {
            let mut state = self.state();
            state.unconfirmed.clear();
            state.next_offset = 0;
            state.cycle = Some(LoadCycle::Fresh);
        }
        self.fetch_pages(ctx).await
    }

    async fn resume_loading(&self, ctx: &LoadContext<'_>) -> Result<LoadCompletion, NetworkError> {
        {
            let mut state = self.state();
            let no_progress = state.next_offset == 0
                && state.confirmed.is_empty()
                && state.unconfirmed.is_empty();
            if no_progress {
                // Nothing to resume from; behave as a fresh load.
                state.cycle = Some(LoadCycle::Fresh);
            } else if state.cycle.is_none() {
                state.cycle = Some(LoadCycle::Resume);
            }
        }
        self.fetch_pages(ctx).await
    }

    fn supports_resume_loading(&self) -> bool {
        self.supports_resume
    }

    fn clear_catalog(&self) {
        let mut state = self.state();
        state.confirmed.clear();
        state.unconfirmed.clear();
        state.next_offset = 0;
        state.cycle = None;
    }

    fn remove_unconfirmed_items(&self) {
        let mut state = self.state();
        match state.cycle.take() {
            Some(LoadCycle::Fresh) => {
                state.confirmed = std::mem::take(&mut state.unconfirmed);
            }
            Some(LoadCycle::Resume) => {
                let promoted = std::mem::take(&mut state.unconfirmed);
                state.confirmed.extend(promoted);
            }
            // No cycle in flight: reconciling again is a no-op on children.
            None => {}
        }
    }

    fn update_loaded_time(&self) {
        self.state().last_loaded = Some(Utc::now());
    }

    fn sub_trees(&self) -> Vec<CatalogEntry> {
        self.state().confirmed.clone()
    }
}

impl std::fmt::Debug for CatalogNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("CatalogNode")
            .field("path", &self.path)
            .field("confirmed", &state.confirmed.len())
            .field("unconfirmed", &state.unconfirmed.len())
            .field("supports_resume", &self.supports_resume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::EntryKind;
    use crate::feed::{CatalogPage, CatalogProvider};
    use tokio_util::sync::CancellationToken;

    fn entry(id: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: format!("Entry {id}"),
            kind: EntryKind::Item,
            href: None,
        }
    }

    fn test_link() -> Arc<CatalogLink> {
        Arc::new(CatalogLink::new(
            "test".to_string(),
            url::Url::parse("http://catalog.test/feed/").unwrap(),
            None,
        ))
    }

    /// Provider serving a fixed entry list in pages of `page_size`.
    struct PagedProvider {
        entries: Vec<CatalogEntry>,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for PagedProvider {
        async fn fetch_page(
            &self,
            _path: &str,
            offset: u64,
            limit: usize,
        ) -> Result<CatalogPage, NetworkError> {
            let start = offset as usize;
            let end = (start + limit).min(self.entries.len());
            Ok(CatalogPage {
                entries: self.entries.get(start..end).unwrap_or(&[]).to_vec(),
                has_more: end < self.entries.len(),
            })
        }
    }

    fn ctx<'a>(provider: &'a dyn CatalogProvider, token: &CancellationToken) -> LoadContext<'a> {
        LoadContext {
            provider,
            token: token.clone(),
            page_size: 2,
        }
    }

    #[tokio::test]
    async fn fresh_load_accumulates_all_pages_unconfirmed() {
        let provider = PagedProvider {
            entries: (0..5).map(|i| entry(&i.to_string())).collect(),
        };
        let node = CatalogNode::root(test_link(), true);
        let token = CancellationToken::new();

        let done = node.load_children(&ctx(&provider, &token)).await.unwrap();
        assert_eq!(done, LoadCompletion::Complete);
        // Nothing visible until reconciliation promotes.
        assert!(node.sub_trees().is_empty());
        assert_eq!(node.state().unconfirmed.len(), 5);
        assert_eq!(node.state().next_offset, 5);
    }

    #[tokio::test]
    async fn promotion_after_fresh_load_replaces_confirmed() {
        let provider = PagedProvider {
            entries: vec![entry("a"), entry("b")],
        };
        let node = CatalogNode::root(test_link(), true);
        node.state().confirmed = vec![entry("stale")];
        let token = CancellationToken::new();

        node.load_children(&ctx(&provider, &token)).await.unwrap();
        node.remove_unconfirmed_items();

        let children = node.sub_trees();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|e| e.id != "stale"));
        assert!(node.state().unconfirmed.is_empty());
    }

    #[tokio::test]
    async fn resume_extends_earlier_promotion() {
        let all: Vec<CatalogEntry> = (0..5).map(|i| entry(&i.to_string())).collect();
        let node = CatalogNode::root(test_link(), true);

        // Simulate a promoted partial load of the first three entries.
        {
            let mut state = node.state();
            state.confirmed = all[..3].to_vec();
            state.next_offset = 3;
        }

        let provider = PagedProvider { entries: all };
        let token = CancellationToken::new();
        let done = node.resume_loading(&ctx(&provider, &token)).await.unwrap();
        assert_eq!(done, LoadCompletion::Complete);

        node.remove_unconfirmed_items();
        let children = node.sub_trees();
        assert_eq!(children.len(), 5);
        assert_eq!(children[3].id, "3");
        assert_eq!(children[4].id, "4");
    }

    #[tokio::test]
    async fn resume_without_progress_falls_back_to_fresh() {
        let provider = PagedProvider {
            entries: vec![entry("a")],
        };
        let node = CatalogNode::root(test_link(), true);
        let token = CancellationToken::new();

        node.resume_loading(&ctx(&provider, &token)).await.unwrap();
        node.remove_unconfirmed_items();
        assert_eq!(node.sub_trees().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_token_interrupts_before_first_page() {
        let provider = PagedProvider {
            entries: vec![entry("a")],
        };
        let node = CatalogNode::root(test_link(), false);
        let token = CancellationToken::new();
        token.cancel();

        let done = node.load_children(&ctx(&provider, &token)).await.unwrap();
        assert_eq!(done, LoadCompletion::Interrupted);
        assert!(node.state().unconfirmed.is_empty());
    }

    #[tokio::test]
    async fn cancellation_mid_fetch_keeps_partial_progress() {
        /// First page succeeds, then cancels the token and blocks.
        struct StallingProvider {
            token: CancellationToken,
        }

        #[async_trait::async_trait]
        impl CatalogProvider for StallingProvider {
            async fn fetch_page(
                &self,
                _path: &str,
                offset: u64,
                _limit: usize,
            ) -> Result<CatalogPage, NetworkError> {
                if offset == 0 {
                    return Ok(CatalogPage {
                        entries: vec![entry("first")],
                        has_more: true,
                    });
                }
                self.token.cancel();
                std::future::pending().await
            }
        }

        let token = CancellationToken::new();
        let provider = StallingProvider {
            token: token.clone(),
        };
        let node = CatalogNode::root(test_link(), true);

        let done = node.load_children(&ctx(&provider, &token)).await.unwrap();
        assert_eq!(done, LoadCompletion::Interrupted);
        assert_eq!(node.state().unconfirmed.len(), 1);
        assert_eq!(node.state().next_offset, 1);
    }

    #[tokio::test]
    async fn clear_catalog_drops_everything() {
        let provider = PagedProvider {
            entries: vec![entry("a"), entry("b"), entry("c")],
        };
        let node = CatalogNode::root(test_link(), true);
        let token = CancellationToken::new();

        node.load_children(&ctx(&provider, &token)).await.unwrap();
        node.remove_unconfirmed_items();
        assert_eq!(node.sub_trees().len(), 3);

        node.clear_catalog();
        assert!(node.sub_trees().is_empty());
        assert_eq!(node.state().next_offset, 0);
    }

    #[test]
    fn promotion_with_no_cycle_is_a_no_op() {
        let node = CatalogNode::root(test_link(), true);
        node.state().confirmed = vec![entry("keep")];

        node.remove_unconfirmed_items();
        assert_eq!(node.sub_trees().len(), 1);
        assert_eq!(node.sub_trees()[0].id, "keep");
    }

    #[test]
    fn update_loaded_time_stamps_now() {
        let node = CatalogNode::root(test_link(), true);
        assert!(node.last_loaded().is_none());
        let before = Utc::now();
        node.update_loaded_time();
        let stamped = node.last_loaded().unwrap();
        assert!(stamped >= before);
        assert!(stamped <= Utc::now());
    }
}
