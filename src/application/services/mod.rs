//! Application services
//!
//! The document store owns the editable history; the layout engine turns any
//! snapshot of it into positioned boxes.

mod document;
mod layout;

pub use document::{Action, DocumentListener, DocumentStore, DEFAULT_ROOT_TITLE};
pub use layout::{
    layout, partition_sides, size_topic, PositionedNode, Spacing, TextMeasure, TextMetrics,
    TopicSize,
};
