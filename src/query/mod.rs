//! Traversal over the reply graph
//!
//! Lists topic starters and rebuilds reply trees to a bounded depth, with
//! deterministic newest-first ordering at every level.

mod order;
mod traverse;

pub use order::{newest_first, sort_newest_first};
pub use traverse::TraversalEngine;
