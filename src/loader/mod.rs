//! The resumable catalog-loading protocol.
//!
//! One load attempt is a three-phase lifecycle driven by
//! [`CatalogLoadTask`]: the authentication gate runs first, then the load
//! step fetches or resumes the node's children, and whatever happens the
//! finish reconciler runs exactly once to turn the outcome into a durable
//! tree-state decision plus change notifications.

pub mod auth_gate;
pub mod finish;
pub mod task;

pub use task::{CatalogLoadTask, LoadOutcome};
