use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{CatalogPage, CatalogProvider};
use crate::catalog::CatalogEntry;
use crate::error::NetworkError;

/// Wire shape of one listing page.
#[derive(Debug, Deserialize)]
struct FeedPage {
    entries: Vec<CatalogEntry>,
    #[serde(default)]
    has_more: bool,
}

/// Catalog provider speaking the JSON paging feed over HTTP.
///
/// Pages are addressed with `offset`/`limit` query parameters relative to
/// the link's base URL.
pub struct HttpCatalogProvider {
    client: Client,
    base: Url,
}

impl HttpCatalogProvider {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn page_url(&self, path: &str, offset: u64, limit: usize) -> Result<Url, NetworkError> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_page(
        &self,
        path: &str,
        offset: u64,
        limit: usize,
    ) -> Result<CatalogPage, NetworkError> {
        let url = self.page_url(path, offset, limit)?;
        debug!(%url, "fetching catalog page");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(NetworkError::Unauthorised(format!(
                    "catalog rejected the request with HTTP {}",
                    response.status().as_u16()
                )));
            }
            status if !status.is_success() => {
                return Err(NetworkError::Status(status.as_u16()));
            }
            _ => {}
        }

        let page: FeedPage = response.json().await?;
        Ok(CatalogPage {
            entries: page.entries,
            has_more: page.has_more,
        })
    }
}
