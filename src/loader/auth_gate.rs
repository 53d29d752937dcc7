use tracing::warn;

use crate::auth::AuthenticationManager;
use crate::catalog::CatalogLink;
use crate::error::NetworkError;

/// Pre-flight authentication check for a catalog load.
///
/// If the link carries a session that is authorised and still needs its
/// one-time initialization, initialize it. A network error anywhere in that
/// sequence logs the session out and is swallowed: initialization failure
/// must not block catalog browsing outright, and the load step will surface
/// a real error if credentials were in fact required.
pub async fn prepare(link: &CatalogLink) -> Result<(), NetworkError> {
    let Some(manager) = link.authentication_manager() else {
        return Ok(());
    };
    if let Err(e) = check_and_initialize(manager.as_ref()).await {
        warn!("session check failed, logging out: {e}");
        manager.log_out().await;
    }
    Ok(())
}

async fn check_and_initialize(manager: &dyn AuthenticationManager) -> Result<(), NetworkError> {
    if manager.is_authorised(true).await? && manager.needs_initialization() {
        manager.initialize().await?;
    }
    Ok(())
}
