//! Newest-first ordering shared by root listings and sibling replies

use crate::reaction::Reaction;
use std::cmp::Ordering;

/// Compare by `created_at` descending, then id descending
pub fn newest_first(a: &Reaction, b: &Reaction) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Sort reactions in place, most recently created first
pub fn sort_newest_first(reactions: &mut [Reaction]) {
    reactions.sort_by(newest_first);
}
