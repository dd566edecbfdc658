//! Entry point consumed by the API layer

use super::error::{ReactionError, ReactionResult};
use super::model::{Reaction, ReactionId};
use super::repository::ReactionRepository;
use crate::query::TraversalEngine;
use crate::storage::GraphStore;
use std::sync::Arc;
use tracing::{info, instrument};

/// Create and look up reactions
///
/// Cheap to clone; clones share the same store. Safe to call from many
/// threads at once since all coordination lives in the store.
#[derive(Clone)]
pub struct ReactionService {
    repository: ReactionRepository,
    traversal: TraversalEngine,
}

impl ReactionService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        let repository = ReactionRepository::new(store);
        let traversal = TraversalEngine::new(repository.clone());
        Self {
            repository,
            traversal,
        }
    }

    /// Start a topic, or reply to `replies_to` when given
    #[instrument(skip(self, content))]
    pub fn create(
        &self,
        title: &str,
        content: &str,
        replies_to: Option<&ReactionId>,
    ) -> ReactionResult<Reaction> {
        if title.trim().is_empty() {
            return Err(ReactionError::InvalidArgument(
                "title must not be empty".to_string(),
            ));
        }

        let reaction = self.repository.create(title, content, replies_to)?;
        info!(id = %reaction.id, root = reaction.is_root(), "reaction created");
        Ok(reaction)
    }

    /// Topic starters, newest first
    pub fn find_roots(&self) -> ReactionResult<Vec<Reaction>> {
        self.traversal.find_roots()
    }

    /// A single reaction without replies
    pub fn find_by_id(&self, id: &ReactionId) -> ReactionResult<Reaction> {
        self.find_by_id_with_depth(id, 0)
    }

    /// A reaction with `depth` levels of replies attached
    pub fn find_by_id_with_depth(&self, id: &ReactionId, depth: i64) -> ReactionResult<Reaction> {
        self.traversal.find_by_id_with_depth(id, depth)
    }
}
