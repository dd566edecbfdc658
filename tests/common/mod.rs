//! Shared fixtures for the integration tests
//!
//! Every scenario runs against each bundled store so both backends are held
//! to the same contract.

#![allow(dead_code)]

use debattons::{GraphStore, MemoryStore, OpenStore, Reaction, ReactionService, SqliteStore};
use std::sync::Arc;

/// Named store factories
pub fn stores() -> Vec<(&'static str, Arc<dyn GraphStore>)> {
    vec![
        ("memory", Arc::new(MemoryStore::new())),
        (
            "sqlite",
            Arc::new(SqliteStore::open_in_memory().expect("open in-memory sqlite")),
        ),
    ]
}

/// A service per store, labelled for assertion messages
pub fn services() -> Vec<(&'static str, ReactionService)> {
    stores()
        .into_iter()
        .map(|(name, store)| (name, ReactionService::new(store)))
        .collect()
}

/// Reaction fields as a caller would post them
pub fn new_test_reaction(label: &str) -> (String, String) {
    (
        format!("Test Title{}", label),
        format!("Test content lorem ipsum{}", label),
    )
}

pub fn titles(reactions: &[Reaction]) -> Vec<&str> {
    reactions.iter().map(|r| r.title.as_str()).collect()
}
