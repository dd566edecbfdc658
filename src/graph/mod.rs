//! Core graph data structures

mod edge;
mod vertex;


pub use edge::{label, Edge};
pub use vertex::{Properties, PropertyValue, Vertex, VertexAttributes, VertexId};
