//! Vertex representation in the discussion graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a vertex
///
/// Store-assigned and opaque to callers. Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(String);

impl VertexId {
    /// Create a new random VertexId (UUID-based)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Typed property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PropertyValue {
    /// Borrow the value as a string slice, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

/// Properties collection
pub type Properties = HashMap<String, PropertyValue>;

/// Caller-supplied part of a vertex
///
/// The store adds the id and the creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexAttributes {
    /// Kind of vertex (e.g., "reaction")
    pub vertex_type: String,
    /// Domain-specific properties
    pub properties: Properties,
}

impl VertexAttributes {
    pub fn new(vertex_type: impl Into<String>) -> Self {
        Self {
            vertex_type: vertex_type.into(),
            properties: HashMap::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A vertex as persisted by a graph store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier
    pub id: VertexId,
    /// Kind of vertex
    pub vertex_type: String,
    /// Domain-specific properties
    pub properties: Properties,
    /// Store-assigned creation time, strictly increasing per store
    pub created_at: DateTime<Utc>,
}

impl Vertex {
    /// Materialize attributes into a vertex
    pub(crate) fn from_attributes(
        id: VertexId,
        attributes: &VertexAttributes,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vertex_type: attributes.vertex_type.clone(),
            properties: attributes.properties.clone(),
            created_at,
        }
    }

    /// Look up a string property
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_str)
    }
}
