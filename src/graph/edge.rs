//! Directed, labelled edges between vertices

use super::vertex::VertexId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Edge labels understood by the discussion model
pub mod label {
    /// Child reaction → the reaction it responds to
    pub const REPLIES_TO: &str = "replies_to";
}

/// A directed edge `source -label-> target`
///
/// Edges carry no weight; the triple (source, label, target) is their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex
    pub source: VertexId,
    /// Target vertex
    pub target: VertexId,
    /// Relation name (see [`label`])
    pub label: String,
    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: VertexId, target: VertexId, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            label: label.into(),
            created_at: Utc::now(),
        }
    }

    /// True if this edge has the same (source, label, target) as `other`
    pub fn same_link(&self, other: &Edge) -> bool {
        self.source == other.source && self.target == other.target && self.label == other.label
    }
}
