//! Fetch side of the protocol: a provider hands out catalog listings one
//! page at a time, addressed by relative path and entry offset.

pub mod http;

pub use http::HttpCatalogProvider;

use crate::catalog::CatalogEntry;
use crate::error::NetworkError;

/// One page of a catalog listing.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    /// Whether the provider has further entries past this page.
    pub has_more: bool,
}

/// Source of catalog pages. Network errors propagate to the caller
/// unchanged; providers perform no local recovery.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_page(
        &self,
        path: &str,
        offset: u64,
        limit: usize,
    ) -> Result<CatalogPage, NetworkError>;
}
