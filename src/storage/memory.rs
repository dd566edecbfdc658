//! In-process graph store

use super::clock::MonotonicClock;
use super::traits::{GraphStore, StorageError, StorageResult, VertexFilter};
use crate::graph::{Edge, Vertex, VertexAttributes, VertexId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryGraph {
    vertices: HashMap<VertexId, Vertex>,
    /// Edges keyed by source vertex
    outgoing: HashMap<VertexId, Vec<Edge>>,
    /// Edges keyed by target vertex
    incoming: HashMap<VertexId, Vec<Edge>>,
}

impl MemoryGraph {
    fn insert_edge(&mut self, edge: Edge) {
        let out = self.outgoing.entry(edge.source.clone()).or_default();
        if out.iter().any(|e| e.same_link(&edge)) {
            return;
        }
        out.push(edge.clone());
        self.incoming.entry(edge.target.clone()).or_default().push(edge);
    }

    fn has_outgoing(&self, id: &VertexId, label: &str) -> bool {
        self.outgoing
            .get(id)
            .is_some_and(|edges| edges.iter().any(|e| e.label == label))
    }
}

/// Graph store kept entirely in memory
///
/// All state sits behind a single `RwLock`: each write (vertex plus its edge)
/// happens under one write guard, so readers see it whole or not at all.
/// Contents vanish when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graph: RwLock<MemoryGraph>,
    clock: MonotonicClock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, MemoryGraph>> {
        self.graph.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, MemoryGraph>> {
        self.graph.write().map_err(|_| StorageError::LockPoisoned)
    }
}

impl GraphStore for MemoryStore {
    fn create_vertex(&self, attributes: &VertexAttributes) -> StorageResult<Vertex> {
        let mut graph = self.write()?;
        let vertex = Vertex::from_attributes(VertexId::generate(), attributes, self.clock.tick()?);
        graph.vertices.insert(vertex.id.clone(), vertex.clone());
        Ok(vertex)
    }

    fn create_linked_vertex(
        &self,
        attributes: &VertexAttributes,
        label: &str,
        target: &VertexId,
    ) -> StorageResult<Vertex> {
        let mut graph = self.write()?;
        if !graph.vertices.contains_key(target) {
            return Err(StorageError::VertexNotFound(target.to_string()));
        }

        let vertex = Vertex::from_attributes(VertexId::generate(), attributes, self.clock.tick()?);
        let mut edge = Edge::new(vertex.id.clone(), target.clone(), label);
        edge.created_at = vertex.created_at;

        graph.vertices.insert(vertex.id.clone(), vertex.clone());
        graph.insert_edge(edge);
        Ok(vertex)
    }

    fn get_vertex(&self, id: &VertexId) -> StorageResult<Option<Vertex>> {
        Ok(self.read()?.vertices.get(id).cloned())
    }

    fn delete_vertex(&self, id: &VertexId) -> StorageResult<bool> {
        let mut graph = self.write()?;
        if graph.vertices.remove(id).is_none() {
            return Ok(false);
        }

        let outgoing = graph.outgoing.remove(id).unwrap_or_default();
        let incoming = graph.incoming.remove(id).unwrap_or_default();
        for edge in outgoing {
            if let Some(edges) = graph.incoming.get_mut(&edge.target) {
                edges.retain(|e| &e.source != id);
            }
        }
        for edge in incoming {
            if let Some(edges) = graph.outgoing.get_mut(&edge.source) {
                edges.retain(|e| &e.target != id);
            }
        }
        Ok(true)
    }

    fn all_vertex_ids(&self, filter: &VertexFilter) -> StorageResult<Vec<VertexId>> {
        let graph = self.read()?;
        let matching: Vec<VertexId> = graph
            .vertices
            .values()
            .filter(|v| {
                filter
                    .vertex_type
                    .as_deref()
                    .map_or(true, |t| v.vertex_type == t)
            })
            .filter(|v| {
                filter
                    .without_outgoing
                    .as_deref()
                    .map_or(true, |label| !graph.has_outgoing(&v.id, label))
            })
            .map(|v| v.id.clone())
            .collect();

        Ok(matching)
    }

    fn create_edge(&self, edge: &Edge) -> StorageResult<()> {
        let mut graph = self.write()?;
        for endpoint in [&edge.source, &edge.target] {
            if !graph.vertices.contains_key(endpoint) {
                return Err(StorageError::VertexNotFound(endpoint.to_string()));
            }
        }
        graph.insert_edge(edge.clone());
        Ok(())
    }

    fn edges_into(&self, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>> {
        let graph = self.read()?;
        Ok(graph
            .incoming
            .get(id)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|e| e.label == label)
                    .map(|e| e.source.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn edges_from(&self, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>> {
        let graph = self.read()?;
        Ok(graph
            .outgoing
            .get(id)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|e| e.label == label)
                    .map(|e| e.target.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::label;

    fn attrs(title: &str) -> VertexAttributes {
        VertexAttributes::new("reaction").with_property("title", title)
    }

    #[test]
    fn test_create_and_get_vertex() {
        let store = MemoryStore::new();
        let vertex = store.create_vertex(&attrs("a")).unwrap();

        let loaded = store.get_vertex(&vertex.id).unwrap().unwrap();
        assert_eq!(loaded, vertex);
        assert_eq!(loaded.string_property("title"), Some("a"));
    }

    #[test]
    fn test_get_missing_vertex() {
        let store = MemoryStore::new();
        assert!(store.get_vertex(&VertexId::from_string("nope")).unwrap().is_none());
    }

    #[test]
    fn test_linked_vertex_creates_edge() {
        let store = MemoryStore::new();
        let parent = store.create_vertex(&attrs("parent")).unwrap();
        let child = store
            .create_linked_vertex(&attrs("child"), label::REPLIES_TO, &parent.id)
            .unwrap();

        assert_eq!(store.edges_into(&parent.id, label::REPLIES_TO).unwrap(), vec![child.id.clone()]);
        assert_eq!(store.edges_from(&child.id, label::REPLIES_TO).unwrap(), vec![parent.id.clone()]);
        assert!(child.created_at > parent.created_at);
    }

    #[test]
    fn test_linked_vertex_to_missing_target_creates_nothing() {
        let store = MemoryStore::new();
        let err = store
            .create_linked_vertex(&attrs("orphan"), label::REPLIES_TO, &VertexId::from_string("ghost"))
            .unwrap_err();

        assert!(matches!(err, StorageError::VertexNotFound(id) if id == "ghost"));
        assert!(store.all_vertex_ids(&VertexFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_filter_without_outgoing() {
        let store = MemoryStore::new();
        let root = store.create_vertex(&attrs("root")).unwrap();
        store
            .create_linked_vertex(&attrs("reply"), label::REPLIES_TO, &root.id)
            .unwrap();
        store
            .create_vertex(&VertexAttributes::new("other"))
            .unwrap();

        let roots = store
            .all_vertex_ids(
                &VertexFilter::new()
                    .with_type("reaction")
                    .without_outgoing(label::REPLIES_TO),
            )
            .unwrap();
        assert_eq!(roots, vec![root.id]);
        assert_eq!(store.all_vertex_ids(&VertexFilter::new()).unwrap().len(), 3);
    }

    #[test]
    fn test_create_edge_requires_endpoints() {
        let store = MemoryStore::new();
        let a = store.create_vertex(&attrs("a")).unwrap();
        let ghost = VertexId::from_string("ghost");

        let err = store
            .create_edge(&Edge::new(a.id.clone(), ghost, label::REPLIES_TO))
            .unwrap_err();
        assert!(matches!(err, StorageError::VertexNotFound(_)));
        assert!(store.edges_from(&a.id, label::REPLIES_TO).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_edge_is_ignored() {
        let store = MemoryStore::new();
        let a = store.create_vertex(&attrs("a")).unwrap();
        let b = store.create_vertex(&attrs("b")).unwrap();

        store.create_edge(&Edge::new(a.id.clone(), b.id.clone(), label::REPLIES_TO)).unwrap();
        store.create_edge(&Edge::new(a.id.clone(), b.id.clone(), label::REPLIES_TO)).unwrap();

        assert_eq!(store.edges_into(&b.id, label::REPLIES_TO).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_vertex_removes_edges() {
        let store = MemoryStore::new();
        let parent = store.create_vertex(&attrs("parent")).unwrap();
        let child = store
            .create_linked_vertex(&attrs("child"), label::REPLIES_TO, &parent.id)
            .unwrap();

        assert!(store.delete_vertex(&child.id).unwrap());
        assert!(!store.delete_vertex(&child.id).unwrap());
        assert!(store.edges_into(&parent.id, label::REPLIES_TO).unwrap().is_empty());
        assert!(store.get_vertex(&child.id).unwrap().is_none());
    }

    #[test]
    fn test_edges_filtered_by_label() {
        let store = MemoryStore::new();
        let a = store.create_vertex(&attrs("a")).unwrap();
        let b = store.create_vertex(&attrs("b")).unwrap();
        store.create_edge(&Edge::new(a.id.clone(), b.id.clone(), "mentions")).unwrap();

        assert!(store.edges_into(&b.id, label::REPLIES_TO).unwrap().is_empty());
        assert_eq!(store.edges_into(&b.id, "mentions").unwrap(), vec![a.id]);
    }
}
