//! Debattons: threaded discussions on a general-purpose graph
//!
//! Every contribution (a *reaction*) either starts a topic or replies to one
//! earlier reaction, so the discussion is a forest of reply trees. Reactions
//! live as vertices of a [`GraphStore`]; a reply carries one `replies_to`
//! edge to its parent.
//!
//! # Core Concepts
//!
//! - **Graph store**: vertex/edge persistence behind a trait
//!   ([`MemoryStore`], [`SqliteStore`])
//! - **Repository**: maps reactions to vertices and edges
//! - **Traversal**: newest-first root listing and depth-bounded reply trees
//! - **Service**: validated create/find operations for the API layer
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use debattons::{MemoryStore, ReactionService};
//!
//! let service = ReactionService::new(Arc::new(MemoryStore::new()));
//! let topic = service.create("Cars downtown?", "", None).unwrap();
//! service.create("Yes", "Less noise", Some(&topic.id)).unwrap();
//!
//! let tree = service.find_by_id_with_depth(&topic.id, 1).unwrap();
//! assert_eq!(tree.child_replies.len(), 1);
//! ```

mod graph;
pub mod query;
pub mod reaction;
pub mod storage;
pub mod telemetry;

pub use graph::{label, Edge, Properties, PropertyValue, Vertex, VertexAttributes, VertexId};
pub use query::TraversalEngine;
pub use reaction::{
    ErrorKind, Reaction, ReactionError, ReactionId, ReactionRepository, ReactionResult,
    ReactionService,
};
pub use storage::{
    GraphStore, MemoryStore, OpenStore, SqliteStore, StorageError, StorageResult, VertexFilter,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
