//! Reactions: the contributions of a threaded discussion
//!
//! A reaction either starts a topic or replies to exactly one earlier
//! reaction. `ReactionRepository` maps them onto graph vertices,
//! `ReactionService` is the surface offered to callers.

mod error;
mod model;
mod repository;
mod service;

pub use error::{ErrorKind, ReactionError, ReactionResult};
pub use model::{Reaction, ReactionId};
pub use repository::{ReactionRepository, REACTION_VERTEX_TYPE};
pub use service::ReactionService;
