//! The content tree: nodes, entries, and the link back to their remote
//! provider. Node mutation is confined to the load protocol in
//! `crate::loader`.

pub mod entry;
pub mod link;
pub mod node;
pub mod tree;

pub use entry::{CatalogEntry, EntryKind};
pub use link::CatalogLink;
pub use node::CatalogNode;
pub use tree::{CatalogTree, LoadCompletion, LoadContext};
