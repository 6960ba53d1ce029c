//! Headless mind-map core
//!
//! A topic tree with a snapshot history (undo/redo), side balancing for the
//! root's children, and a deterministic two-sided layout engine.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{layout, Action, DocumentListener, DocumentStore, Spacing};
pub use domain::{Side, TopicId, TopicNode, TopicPatch};
