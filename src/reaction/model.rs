//! Reaction entity

use crate::graph::VertexId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a reaction (the id of its backing vertex)
pub type ReactionId = VertexId;

/// A single contribution in the discussion forest
///
/// `replies_to_parent_id` is the reaction this one answers (`None` for a
/// topic starter). `child_replies` is only filled by depth-bounded lookups and
/// holds replies to this reaction, newest first. On the wire they keep the
/// historical names `repliesToId` and `repliesTo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: ReactionId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "repliesToId", default, skip_serializing_if = "Option::is_none")]
    pub replies_to_parent_id: Option<ReactionId>,
    #[serde(rename = "repliesTo", default)]
    pub child_replies: Vec<Reaction>,
}

impl Reaction {
    /// True if this reaction starts a topic
    pub fn is_root(&self) -> bool {
        self.replies_to_parent_id.is_none()
    }

    /// Number of reactions in the attached subtree, excluding this one
    pub fn attached_reply_count(&self) -> usize {
        self.child_replies
            .iter()
            .map(|r| 1 + r.attached_reply_count())
            .sum()
    }
}
