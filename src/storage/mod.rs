//! Graph storage backends
//!
//! The discussion core talks to storage only through the `GraphStore` trait.
//! `SqliteStore` persists to disk; `MemoryStore` keeps everything in process.

mod clock;
mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{GraphStore, OpenStore, StorageError, StorageResult, VertexFilter};
