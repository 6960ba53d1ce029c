//! Domain layer: topic tree entities and pure tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod outline;
pub mod topic;
pub mod walker;

pub use arena::{LayoutArena, LayoutNode};
pub use error::{DomainError, DomainResult};
pub use outline::TopicTreeConvert;
pub use topic::{Children, Side, TopicId, TopicNode, TopicPatch};
