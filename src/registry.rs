use tracing::{info, warn};

/// Kind of change notification the reconciler can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCode {
    NetworkError,
    EmptyCatalog,
}

/// Sink for post-load consistency bookkeeping.
///
/// Injected into the reconciler rather than reached through a global, so the
/// core carries no hidden shared state. The registry serializes its own
/// mutations; reconcilers from concurrent loads may call it at any time.
pub trait CatalogRegistry: Send + Sync {
    /// Surface a user-visible notification about the finished load.
    fn fire_change_event(&self, code: ChangeCode, message: Option<&str>);

    /// Catalog visibility may have changed; downstream views must recompute.
    fn invalidate_visibility(&self);

    /// Sibling and ancestor catalogs relying on this node's content should
    /// resynchronize.
    fn synchronize(&self);
}

/// Registry sink that reports through the log stream. Good enough for the
/// CLI driver, where there is no view layer to keep consistent.
pub struct LoggingRegistry;

impl CatalogRegistry for LoggingRegistry {
    fn fire_change_event(&self, code: ChangeCode, message: Option<&str>) {
        match code {
            ChangeCode::NetworkError => {
                warn!("catalog load failed: {}", message.unwrap_or("unknown error"));
            }
            ChangeCode::EmptyCatalog => {
                info!("catalog is empty");
            }
        }
    }

    fn invalidate_visibility(&self) {
        info!("catalog visibility invalidated");
    }

    fn synchronize(&self) {
        info!("catalog state synchronized");
    }
}
