//! Mapping between reactions and graph vertices

use super::error::{ReactionError, ReactionResult};
use super::model::{Reaction, ReactionId};
use crate::graph::{label, Vertex, VertexAttributes};
use crate::storage::{GraphStore, VertexFilter};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Vertex type tag for reactions
pub const REACTION_VERTEX_TYPE: &str = "reaction";

const TITLE: &str = "title";
const CONTENT: &str = "content";

/// Reads and writes reactions as vertices of a [`GraphStore`]
///
/// A reply is a vertex with exactly one outgoing `replies_to` edge, written
/// together with the vertex.
#[derive(Clone)]
pub struct ReactionRepository {
    store: Arc<dyn GraphStore>,
}

impl ReactionRepository {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Persist a new reaction, optionally linked to the reaction it answers
    #[instrument(skip(self, content))]
    pub fn create(
        &self,
        title: &str,
        content: &str,
        replies_to: Option<&ReactionId>,
    ) -> ReactionResult<Reaction> {
        let attributes = VertexAttributes::new(REACTION_VERTEX_TYPE)
            .with_property(TITLE, title)
            .with_property(CONTENT, content);

        let vertex = match replies_to {
            Some(parent_id) => {
                // Only reaction vertices may be replied to
                self.get_by_id(parent_id)?;
                self.store
                    .create_linked_vertex(&attributes, label::REPLIES_TO, parent_id)?
            }
            None => self.store.create_vertex(&attributes)?,
        };

        debug!(id = %vertex.id, "created reaction");
        to_reaction(vertex, replies_to.cloned())
    }

    /// Load a reaction, including the id of the reaction it answers
    #[instrument(skip(self))]
    pub fn get_by_id(&self, id: &ReactionId) -> ReactionResult<Reaction> {
        let vertex = self
            .store
            .get_vertex(id)?
            .filter(|v| v.vertex_type == REACTION_VERTEX_TYPE)
            .ok_or_else(|| ReactionError::NotFound(id.to_string()))?;

        let mut parents = self.store.edges_from(id, label::REPLIES_TO)?;
        if parents.len() > 1 {
            return Err(ReactionError::InvalidState(format!(
                "reaction {} replies to {} reactions",
                id,
                parents.len()
            )));
        }

        to_reaction(vertex, parents.pop())
    }

    /// All direct replies to `id`, in no particular order
    ///
    /// Sources of `replies_to` edges that are not reactions are skipped.
    #[instrument(skip(self))]
    pub fn children_of(&self, id: &ReactionId) -> ReactionResult<Vec<Reaction>> {
        let mut children = Vec::new();
        for child_id in self.store.edges_into(id, label::REPLIES_TO)? {
            let vertex = self.store.get_vertex(&child_id)?.ok_or_else(|| {
                ReactionError::InvalidState(format!(
                    "reply edge from missing vertex {} to {}",
                    child_id, id
                ))
            })?;
            if vertex.vertex_type != REACTION_VERTEX_TYPE {
                debug!(%child_id, vertex_type = %vertex.vertex_type, "skipping non-reaction reply source");
                continue;
            }
            children.push(to_reaction(vertex, Some(id.clone()))?);
        }
        Ok(children)
    }

    /// Ids of every reaction that replies to nothing
    #[instrument(skip(self))]
    pub fn all_root_ids(&self) -> ReactionResult<Vec<ReactionId>> {
        let filter = VertexFilter::new()
            .with_type(REACTION_VERTEX_TYPE)
            .without_outgoing(label::REPLIES_TO);
        Ok(self.store.all_vertex_ids(&filter)?)
    }
}

fn required_property(vertex: &Vertex, key: &str) -> ReactionResult<String> {
    vertex
        .string_property(key)
        .map(str::to_string)
        .ok_or_else(|| ReactionError::InvalidState(format!("vertex {} has no {}", vertex.id, key)))
}

fn to_reaction(vertex: Vertex, replies_to_parent_id: Option<ReactionId>) -> ReactionResult<Reaction> {
    let title = required_property(&vertex, TITLE)?;
    let content = required_property(&vertex, CONTENT)?;

    Ok(Reaction {
        id: vertex.id,
        title,
        content,
        created_at: vertex.created_at,
        replies_to_parent_id,
        child_replies: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError, StorageResult};
    use crate::graph::{Edge, VertexId};

    fn repo() -> (Arc<MemoryStore>, ReactionRepository) {
        let store = Arc::new(MemoryStore::new());
        let repository = ReactionRepository::new(store.clone());
        (store, repository)
    }

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReactionRepository>();
    }

    #[test]
    fn test_create_round_trip() {
        let (_, repository) = repo();
        let created = repository.create("Title", "Body", None).unwrap();

        assert!(!created.id.is_empty());
        let loaded = repository.get_by_id(&created.id).unwrap();
        assert_eq!(loaded.title, "Title");
        assert_eq!(loaded.content, "Body");
        assert_eq!(loaded.created_at, created.created_at);
        assert!(loaded.is_root());
    }

    #[test]
    fn test_reply_records_parent() {
        let (_, repository) = repo();
        let parent = repository.create("Parent", "", None).unwrap();
        let reply = repository.create("Reply", "", Some(&parent.id)).unwrap();

        assert_eq!(reply.replies_to_parent_id.as_ref(), Some(&parent.id));
        let loaded = repository.get_by_id(&reply.id).unwrap();
        assert_eq!(loaded.replies_to_parent_id, Some(parent.id));
    }

    #[test]
    fn test_reply_to_missing_parent_creates_nothing() {
        let (store, repository) = repo();
        let err = repository
            .create("Lost", "", Some(&VertexId::from_string("ghost")))
            .unwrap_err();

        assert!(matches!(err, ReactionError::NotFound(id) if id == "ghost"));
        assert!(store.all_vertex_ids(&VertexFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_reply_to_non_reaction_vertex_is_not_found() {
        let (store, repository) = repo();
        let other = store.create_vertex(&VertexAttributes::new("version")).unwrap();

        let err = repository.create("Reply", "", Some(&other.id)).unwrap_err();
        assert!(matches!(err, ReactionError::NotFound(_)));
        assert!(matches!(repository.get_by_id(&other.id), Err(ReactionError::NotFound(_))));
    }

    #[test]
    fn test_non_reaction_reply_source_is_skipped() {
        let (store, repository) = repo();
        let root = repository.create("Root", "", None).unwrap();
        let reply = repository.create("Reply", "", Some(&root.id)).unwrap();
        store
            .create_linked_vertex(
                &VertexAttributes::new("version").with_property(TITLE, "v1"),
                label::REPLIES_TO,
                &root.id,
            )
            .unwrap();

        let children = repository.children_of(&root.id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, reply.id);
    }

    #[test]
    fn test_children_and_roots() {
        let (_, repository) = repo();
        let root = repository.create("Root", "", None).unwrap();
        let other_root = repository.create("Other", "", None).unwrap();
        let a = repository.create("A", "", Some(&root.id)).unwrap();
        let b = repository.create("B", "", Some(&root.id)).unwrap();
        repository.create("A1", "", Some(&a.id)).unwrap();

        let mut children: Vec<_> = repository
            .children_of(&root.id)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        children.sort();
        let mut expected = vec![a.id.clone(), b.id];
        expected.sort();
        assert_eq!(children, expected);
        assert!(repository.children_of(&other_root.id).unwrap().is_empty());

        let mut roots = repository.all_root_ids().unwrap();
        roots.sort();
        let mut expected_roots = vec![root.id, other_root.id];
        expected_roots.sort();
        assert_eq!(roots, expected_roots);
    }

    #[test]
    fn test_second_parent_edge_is_invalid_state() {
        let (store, repository) = repo();
        let p1 = repository.create("P1", "", None).unwrap();
        let p2 = repository.create("P2", "", None).unwrap();
        let child = repository.create("C", "", Some(&p1.id)).unwrap();
        store
            .create_edge(&Edge::new(child.id.clone(), p2.id, label::REPLIES_TO))
            .unwrap();

        assert!(matches!(
            repository.get_by_id(&child.id),
            Err(ReactionError::InvalidState(_))
        ));
    }

    #[test]
    fn test_vertex_without_content_is_invalid_state() {
        let (store, repository) = repo();
        let contentless = store
            .create_vertex(&VertexAttributes::new(REACTION_VERTEX_TYPE).with_property(TITLE, "T"))
            .unwrap();
        assert!(matches!(
            repository.get_by_id(&contentless.id),
            Err(ReactionError::InvalidState(msg)) if msg.contains("content")
        ));
    }

    #[test]
    fn test_vertex_without_title_is_invalid_state() {
        let (store, repository) = repo();
        let bare = store
            .create_vertex(&VertexAttributes::new(REACTION_VERTEX_TYPE))
            .unwrap();
        assert!(matches!(
            repository.get_by_id(&bare.id),
            Err(ReactionError::InvalidState(_))
        ));
    }

    /// Store whose reads always fail
    struct BrokenStore;

    impl GraphStore for BrokenStore {
        fn create_vertex(&self, _: &VertexAttributes) -> StorageResult<Vertex> {
            Err(StorageError::LockPoisoned)
        }
        fn create_linked_vertex(&self, _: &VertexAttributes, _: &str, _: &VertexId) -> StorageResult<Vertex> {
            Err(StorageError::LockPoisoned)
        }
        fn get_vertex(&self, _: &VertexId) -> StorageResult<Option<Vertex>> {
            Err(StorageError::LockPoisoned)
        }
        fn delete_vertex(&self, _: &VertexId) -> StorageResult<bool> {
            Err(StorageError::LockPoisoned)
        }
        fn all_vertex_ids(&self, _: &VertexFilter) -> StorageResult<Vec<VertexId>> {
            Err(StorageError::LockPoisoned)
        }
        fn create_edge(&self, _: &Edge) -> StorageResult<()> {
            Err(StorageError::LockPoisoned)
        }
        fn edges_into(&self, _: &VertexId, _: &str) -> StorageResult<Vec<VertexId>> {
            Err(StorageError::LockPoisoned)
        }
        fn edges_from(&self, _: &VertexId, _: &str) -> StorageResult<Vec<VertexId>> {
            Err(StorageError::LockPoisoned)
        }
    }

    #[test]
    fn test_store_failures_propagate() {
        let repository = ReactionRepository::new(Arc::new(BrokenStore));
        assert!(matches!(
            repository.create("T", "", None),
            Err(ReactionError::Storage(StorageError::LockPoisoned))
        ));
        assert!(matches!(
            repository.all_root_ids(),
            Err(ReactionError::Storage(_))
        ));
    }
}
