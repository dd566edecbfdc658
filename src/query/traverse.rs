//! Root listing and depth-bounded reply tree assembly

use super::order::sort_newest_first;
use crate::reaction::{Reaction, ReactionError, ReactionId, ReactionRepository, ReactionResult};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Walks the reply graph through a [`ReactionRepository`]
///
/// Stateless: every call reads whatever the store holds at that moment.
#[derive(Clone)]
pub struct TraversalEngine {
    repository: ReactionRepository,
}

impl TraversalEngine {
    pub fn new(repository: ReactionRepository) -> Self {
        Self { repository }
    }

    /// All topic starters, most recently created first, without replies
    #[instrument(skip(self))]
    pub fn find_roots(&self) -> ReactionResult<Vec<Reaction>> {
        let mut roots = self
            .repository
            .all_root_ids()?
            .iter()
            .map(|id| self.repository.get_by_id(id))
            .collect::<ReactionResult<Vec<_>>>()?;

        sort_newest_first(&mut roots);
        debug!(count = roots.len(), "listed root reactions");
        Ok(roots)
    }

    /// Load a reaction with up to `depth` levels of replies attached
    ///
    /// Depth 0 returns the reaction alone. Each level is sorted newest first.
    /// The walk is breadth-first, one level per iteration, so it never goes
    /// deeper than `depth` whatever the size of the subtree.
    #[instrument(skip(self))]
    pub fn find_by_id_with_depth(&self, id: &ReactionId, depth: i64) -> ReactionResult<Reaction> {
        let depth = usize::try_from(depth).map_err(|_| {
            ReactionError::InvalidArgument(format!("depth must be non-negative, got {}", depth))
        })?;

        let origin = self.repository.get_by_id(id)?;
        let mut tree = ReplyTree::new(origin);
        let mut current_level: Vec<usize> = vec![0];

        for level in 0..depth {
            if current_level.is_empty() {
                break;
            }

            let mut next_level = Vec::new();
            for &slot in &current_level {
                let mut children = self.repository.children_of(tree.id_at(slot))?;
                sort_newest_first(&mut children);
                for child in children {
                    next_level.push(tree.attach(slot, child)?);
                }
            }

            debug!(level = level + 1, count = next_level.len(), "expanded reply level");
            current_level = next_level;
        }

        tree.assemble()
    }
}

struct Slot {
    reaction: Reaction,
    children: Vec<usize>,
}

/// Arena holding one traversal's nodes; children always sit after their parent
struct ReplyTree {
    slots: Vec<Slot>,
    visited: HashSet<ReactionId>,
}

impl ReplyTree {
    fn new(origin: Reaction) -> Self {
        let mut visited = HashSet::new();
        visited.insert(origin.id.clone());
        Self {
            slots: vec![Slot {
                reaction: origin,
                children: Vec::new(),
            }],
            visited,
        }
    }

    fn id_at(&self, slot: usize) -> &ReactionId {
        &self.slots[slot].reaction.id
    }

    /// Record `child` under `parent`, refusing any vertex already reached
    fn attach(&mut self, parent: usize, child: Reaction) -> ReactionResult<usize> {
        if !self.visited.insert(child.id.clone()) {
            return Err(ReactionError::InvalidState(format!(
                "reaction {} reached twice below {}",
                child.id,
                self.id_at(0)
            )));
        }

        let slot = self.slots.len();
        self.slots.push(Slot {
            reaction: child,
            children: Vec::new(),
        });
        self.slots[parent].children.push(slot);
        Ok(slot)
    }

    /// Fold the arena into an owned tree, deepest slots first
    fn assemble(self) -> ReactionResult<Reaction> {
        let (mut reactions, children): (Vec<Option<Reaction>>, Vec<Vec<usize>>) = self
            .slots
            .into_iter()
            .map(|slot| (Some(slot.reaction), slot.children))
            .unzip();

        for slot in (0..reactions.len()).rev() {
            let replies = children[slot]
                .iter()
                .map(|&child| {
                    reactions[child].take().ok_or_else(|| {
                        ReactionError::InvalidState(format!("reply slot {} claimed twice", child))
                    })
                })
                .collect::<ReactionResult<Vec<_>>>()?;

            if let Some(reaction) = reactions[slot].as_mut() {
                reaction.child_replies = replies;
            }
        }

        reactions
            .first_mut()
            .and_then(Option::take)
            .ok_or_else(|| ReactionError::InvalidState("empty reply tree".to_string()))
    }
}
