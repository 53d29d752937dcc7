use crate::catalog::CatalogTree;
use crate::registry::{CatalogRegistry, ChangeCode};

/// Terminal reconciliation of a load attempt.
///
/// Runs exactly once per attempt, never fails, and must not be cancelled
/// once started. Decision order matters:
///
/// 1. An interruption on a node that can't resume, or any interruption that
///    coincided with an error, leaves state in an unknown condition — the
///    whole catalog is discarded.
/// 2. Everything else promotes the cycle's unconfirmed children, drops stale
///    leftovers, and stamps the load time. Non-interrupted runs additionally
///    report a network error or an empty catalog, and either way the
///    registry recomputes visibility and resynchronizes.
///
/// Note the first branch only looks at `interrupted`: a plain error without
/// interruption still takes the promotion path and surfaces the error as a
/// notification instead. Callers rely on that ordering.
pub fn finish(
    tree: &dyn CatalogTree,
    registry: &dyn CatalogRegistry,
    error_message: Option<&str>,
    interrupted: bool,
) {
    if interrupted && (!tree.supports_resume_loading() || error_message.is_some()) {
        tree.clear_catalog();
        return;
    }

    tree.remove_unconfirmed_items();
    tree.update_loaded_time();
    if !interrupted {
        if let Some(message) = error_message {
            registry.fire_change_event(ChangeCode::NetworkError, Some(message));
        } else if tree.sub_trees().is_empty() {
            registry.fire_change_event(ChangeCode::EmptyCatalog, None);
        }
    }
    registry.invalidate_visibility();
    registry.synchronize();
}
