//! Authentication for catalogs that gate their listings.
//!
//! The load protocol only sees the [`AuthenticationManager`] trait; the
//! concrete token-session implementation lives in `session`.

pub mod session;

pub use session::TokenSessionManager;

use crate::error::NetworkError;

/// Session surface the pre-flight authentication gate works against.
///
/// A manager is owned by its [`crate::catalog::CatalogLink`] and outlives
/// individual load attempts. Implementations serialize their own state
/// mutations: the gate may log the session out from concurrent loads
/// against different nodes sharing the same link.
#[async_trait::async_trait]
pub trait AuthenticationManager: Send + Sync {
    /// Whether the session currently holds valid credentials.
    /// `force_refresh` revalidates against the backend instead of trusting
    /// cached state, and may fail with a network error.
    async fn is_authorised(&self, force_refresh: bool) -> Result<bool, NetworkError>;

    /// Whether the authorised session still needs its one-time
    /// initialization before listings can be fetched.
    fn needs_initialization(&self) -> bool;

    /// Perform the one-time session initialization. Attempted at most once
    /// per authorised session per load attempt.
    async fn initialize(&self) -> Result<(), NetworkError>;

    /// Drop back to logged-out state.
    async fn log_out(&self);
}
