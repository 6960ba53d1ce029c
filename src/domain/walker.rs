//! Read-only traversal over a topic tree, plus the copy-on-write helpers the
//! document store uses to edit a snapshot along a single path.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::{Side, TopicId, TopicNode};

/// Depth-first lookup of `id` below (and including) `root`.
#[instrument(level = "trace", skip(root))]
pub fn get_node<'a>(root: &'a TopicNode, id: &TopicId) -> Option<&'a TopicNode> {
    iter(root).map(|(_, node)| node).find(|node| &node.id == id)
}

/// Direct parent of `id`; `None` for the root itself or an unknown id.
#[instrument(level = "trace", skip(root))]
pub fn get_parent_node<'a>(root: &'a TopicNode, id: &TopicId) -> Option<&'a TopicNode> {
    iter(root)
        .map(|(_, node)| node)
        .find(|node| node.children().any(|child| &child.id == id))
}

/// All nodes strictly below `node`, in pre-order.
pub fn get_descendants(node: &TopicNode) -> Vec<&TopicNode> {
    iter(node).skip(1).map(|(_, n)| n).collect()
}

pub fn contains(root: &TopicNode, id: &TopicId) -> bool {
    get_node(root, id).is_some()
}

/// Child indices leading from `root` to `id`. Empty for the root itself.
pub fn path_to(root: &TopicNode, id: &TopicId) -> Option<Vec<usize>> {
    if &root.id == id {
        return Some(Vec::new());
    }
    root.children().enumerate().find_map(|(index, child)| {
        path_to(child, id).map(|mut rest| {
            rest.insert(0, index);
            rest
        })
    })
}

/// Mutable access to the node at `path`.
///
/// Every node on the way is cloned if still shared with another snapshot;
/// siblings off the path stay shared.
pub fn node_at_path_mut<'a>(root: &'a mut TopicNode, path: &[usize]) -> Option<&'a mut TopicNode> {
    let mut node = root;
    for &index in path {
        node = node.child_mut(index)?;
    }
    Some(node)
}

/// Side for a new direct child of `root`, computed from the counts before
/// insertion: `left` when `total / 2 > left`, otherwise `right`.
pub fn balanced_side(root: &TopicNode) -> Side {
    let total = root.child_count();
    let left = count_side(root, Side::Left);
    if total > 2 * left {
        Side::Left
    } else {
        Side::Right
    }
}

pub fn count_side(root: &TopicNode, side: Side) -> usize {
    root.children().filter(|c| c.side == Some(side)).count()
}

/// New leaf topic with a fresh id.
pub fn create_topic(title: impl Into<String>) -> TopicNode {
    TopicNode::new(TopicId::generate(), title)
}

/// Assign sides to root children that lack one and clear sides below them.
///
/// Missing sides go to whichever side is currently smaller, `left` on a tie.
pub fn normalize_topic_side(root: &mut TopicNode) {
    root.side = None;
    let mut left = count_side(root, Side::Left);
    let mut right = count_side(root, Side::Right);
    for child in root.children.attached.iter_mut() {
        let child = Arc::make_mut(child);
        if child.side.is_none() {
            let side = if left <= right { Side::Left } else { Side::Right };
            match side {
                Side::Left => left += 1,
                Side::Right => right += 1,
            }
            child.side = Some(side);
        }
        clear_sides(child);
    }
}

/// Remove `side` from every descendant of `node`.
pub fn clear_sides(node: &mut TopicNode) {
    for child in node.children.attached.iter_mut() {
        let child = Arc::make_mut(child);
        child.side = None;
        clear_sides(child);
    }
}

/// Root with two main topics, one per side.
pub fn default_root(title: impl Into<String>) -> TopicNode {
    let mut root = create_topic(title)
        .with_child(create_topic("main topic 1"))
        .with_child(create_topic("main topic 2"));
    normalize_topic_side(&mut root);
    root
}

/// Pre-order iterator yielding `(depth, node)`.
pub fn iter(root: &TopicNode) -> TopicIter<'_> {
    TopicIter { stack: vec![(0, root)] }
}

pub struct TopicIter<'a> {
    stack: Vec<(usize, &'a TopicNode)>,
}

impl<'a> Iterator for TopicIter<'a> {
    type Item = (usize, &'a TopicNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
