//! Storage trait definitions

use crate::graph::{Edge, Vertex, VertexAttributes, VertexId};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Vertex not found: {0}")]
    VertexNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filter criteria for enumerating vertices
#[derive(Debug, Clone, Default)]
pub struct VertexFilter {
    /// Only vertices of this type
    pub vertex_type: Option<String>,
    /// Only vertices with no outgoing edge carrying this label
    pub without_outgoing: Option<String>,
}

impl VertexFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, vertex_type: impl Into<String>) -> Self {
        self.vertex_type = Some(vertex_type.into());
        self
    }

    pub fn without_outgoing(mut self, label: impl Into<String>) -> Self {
        self.without_outgoing = Some(label.into());
        self
    }
}

/// Trait for graph storage backends
///
/// Implementations must be thread-safe (Send + Sync): every method may be
/// called concurrently with any other. A reader never observes a vertex
/// created by [`GraphStore::create_linked_vertex`] without its edge.
pub trait GraphStore: Send + Sync {
    // === Vertex Operations ===

    /// Create a vertex, assigning a fresh id and creation timestamp
    fn create_vertex(&self, attributes: &VertexAttributes) -> StorageResult<Vertex>;

    /// Create a vertex together with one outgoing edge to `target`
    ///
    /// Both become visible at once. Fails with `VertexNotFound` and creates
    /// nothing when `target` does not exist.
    fn create_linked_vertex(
        &self,
        attributes: &VertexAttributes,
        label: &str,
        target: &VertexId,
    ) -> StorageResult<Vertex>;

    /// Load a vertex by ID
    fn get_vertex(&self, id: &VertexId) -> StorageResult<Option<Vertex>>;

    /// Delete a vertex and every edge touching it
    fn delete_vertex(&self, id: &VertexId) -> StorageResult<bool>;

    /// Enumerate vertex ids matching filter criteria (unordered)
    fn all_vertex_ids(&self, filter: &VertexFilter) -> StorageResult<Vec<VertexId>>;

    // === Edge Operations ===

    /// Create an edge between two existing vertices
    ///
    /// Re-creating an existing (source, label, target) link is a no-op.
    fn create_edge(&self, edge: &Edge) -> StorageResult<()>;

    /// Sources of edges with `label` pointing at `id`
    fn edges_into(&self, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>>;

    /// Targets of edges with `label` leaving `id`
    fn edges_from(&self, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
