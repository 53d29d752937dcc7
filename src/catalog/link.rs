use std::sync::Arc;

use url::Url;

use crate::auth::AuthenticationManager;

/// Identity of a remote catalog provider.
///
/// A link may carry an authentication session; the session outlives
/// individual load attempts and serializes its own state mutations, so
/// concurrent loads against different nodes of the same link can share it.
pub struct CatalogLink {
    title: String,
    base: Url,
    auth: Option<Arc<dyn AuthenticationManager>>,
}

impl CatalogLink {
    pub fn new(title: String, base: Url, auth: Option<Arc<dyn AuthenticationManager>>) -> Self {
        Self { title, base, auth }
    }

    #[allow(dead_code)]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn authentication_manager(&self) -> Option<&Arc<dyn AuthenticationManager>> {
        self.auth.as_ref()
    }
}

impl std::fmt::Debug for CatalogLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLink")
            .field("title", &self.title)
            .field("base", &self.base.as_str())
            .field("authenticated", &self.auth.is_some())
            .finish()
    }
}
