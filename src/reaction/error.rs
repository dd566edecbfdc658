//! Errors surfaced by the reaction core

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur in reaction operations
#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("Reaction not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid graph state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

/// Result type for reaction operations
pub type ReactionResult<T> = Result<T, ReactionError>;

/// Coarse classification for callers mapping errors onto responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InvalidState,
    Storage,
}

impl ReactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReactionError::NotFound(_) => ErrorKind::NotFound,
            ReactionError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ReactionError::InvalidState(_) => ErrorKind::InvalidState,
            ReactionError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<StorageError> for ReactionError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::VertexNotFound(id) => ReactionError::NotFound(id),
            other => ReactionError::Storage(other),
        }
    }
}
