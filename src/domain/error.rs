//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::TopicId;

/// Reasons a structural intent is refused.
///
/// The document store never surfaces these to its caller; they are logged and
/// the tree is left as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown topic: {0}")]
    UnknownTopic(TopicId),

    #[error("the root topic cannot be deleted or moved")]
    RootImmutable,

    #[error("cycle detected: {node} cannot be attached under {parent}")]
    CycleDetected { node: TopicId, parent: TopicId },

    #[error("topic already present in tree: {0}")]
    DuplicateTopic(TopicId),

    #[error("document is readonly")]
    Readonly,

    #[error("internal action must not be dispatched directly: {0}")]
    ReservedAction(&'static str),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
