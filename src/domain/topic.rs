//! Topic tree entities
//!
//! Children are held behind `Arc` so a snapshot can be cloned in O(1) and
//! mutated along a single root-to-node path (see `walker::node_at_path_mut`).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, immutable topic identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TopicId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TopicId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Fan-out side of a root-level branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction: -1 for left, +1 for right.
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Child collections of a topic.
///
/// Only `attached` is traversed and edited. Other kinds found in an exchange
/// document are kept verbatim under `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Children {
    #[serde(default)]
    pub attached: Vec<Arc<TopicNode>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, toml::Value>,
}

/// A node of the mind-map tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicNode {
    pub id: TopicId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default)]
    pub children: Children,
}

impl TopicNode {
    pub fn new(id: impl Into<TopicId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            side: None,
            children: Children::default(),
        }
    }

    /// Builder-style helper appending a child.
    pub fn with_child(mut self, child: TopicNode) -> Self {
        self.children.attached.push(Arc::new(child));
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Attached children in order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &TopicNode> + ExactSizeIterator {
        self.children.attached.iter().map(|c| c.as_ref())
    }

    pub fn child_count(&self) -> usize {
        self.children.attached.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.attached.is_empty()
    }

    /// Number of nodes in this subtree, self included.
    pub fn size(&self) -> usize {
        1 + self.children().map(TopicNode::size).sum::<usize>()
    }

    /// Mutable access to child `index`, cloning it first if it is shared
    /// with another snapshot.
    pub(crate) fn child_mut(&mut self, index: usize) -> Option<&mut TopicNode> {
        self.children.attached.get_mut(index).map(Arc::make_mut)
    }
}

/// Shallow field update for `UpdateNode`.
///
/// `id` and children are deliberately absent: they are never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl TopicPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            side: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.side.is_none()
    }
}
