//! Mind-map layout engine
//!
//! Pure function from a topic tree to positioned boxes. Each side of the root
//! is laid out as an independent right-growing tree:
//!
//! 1. sizing: text measurement gives content size, gaps give the box size
//! 2. x: every child starts at its parent's right edge
//! 3. subtree heights are summed bottom-up, sibling subtrees are stacked
//! 4. parents are centered on their children (or children on a taller parent)
//!
//! The left tree is then mirrored, both trees are aligned on the root, the
//! per-depth connector offset is added outward and everything is shifted so
//! the root's top-left corner sits at the origin.

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::arena::LayoutBox;
use crate::domain::{LayoutArena, Side, TopicId, TopicNode, TopicTreeConvert};

/// Spacing constants of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub min_topic_height: f64,
    pub max_topic_width: f64,
    /// Horizontal gap between a node and its children, and between sibling
    /// subtrees of a node that has children.
    pub padding: f64,
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Extra horizontal distance per depth level, kept free for connectors.
    pub depth_offset: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            min_topic_height: 30.0,
            max_topic_width: 200.0,
            padding: 12.0,
            font_size: 14.0,
            line_height: 1.4,
            depth_offset: 70.0,
        }
    }
}

impl Spacing {
    /// Inner vertical padding of a topic box.
    pub fn vertical_padding(&self) -> f64 {
        self.padding * 2.0
    }
}

/// Result of measuring a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
}

/// Text measurement collaborator.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics;
}

impl<F: Fn(&str, f64) -> TextMetrics> TextMeasure for F {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        self(text, font_size)
    }
}

/// Content size of one topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicSize {
    pub content_width: f64,
    pub content_height: f64,
    pub lines: u32,
}

/// Wrap `title` at `max_topic_width` and derive its content box.
pub fn size_topic(title: &str, measure: &dyn TextMeasure, spacing: &Spacing) -> TopicSize {
    let width = measure.measure(title, spacing.font_size).width.max(0.0);
    let lines = ((width / spacing.max_topic_width).ceil() as u32).max(1);
    TopicSize {
        content_width: width.min(spacing.max_topic_width),
        content_height: spacing
            .min_topic_height
            .max(spacing.font_size * spacing.line_height * f64::from(lines)),
        lines,
    }
}

/// A topic with its computed placement. Mirrors the topic tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: TopicId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub hgap: f64,
    pub vgap: f64,
    pub children: Vec<PositionedNode>,
}

impl PositionedNode {
    /// Pre-order walk over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &PositionedNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, id: &TopicId) -> Option<&PositionedNode> {
        self.iter().find(|n| &n.id == id)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl TopicTreeConvert for PositionedNode {
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!(
            "{} ({:.1}, {:.1}) {:.1}x{:.1}",
            self.title, self.x, self.y, self.width, self.height
        );
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label).with_leaves(leaves)
    }
}

/// Lay out `root` into editor coordinates.
///
/// Deterministic: the same tree, measurer and spacing always give the same
/// output.
#[instrument(level = "debug", skip(root, measure), fields(root = %root.id))]
pub fn layout(root: &TopicNode, measure: &dyn TextMeasure, spacing: &Spacing) -> PositionedNode {
    let sides = partition_sides(root);

    let mut left = side_arena(root, &sides, Side::Left, measure, spacing);
    let mut right = side_arena(root, &sides, Side::Right, measure, spacing);
    stack_tree(&mut left.arena);
    stack_tree(&mut right.arena);
    left.arena.mirror_horizontally();

    // align both halves on the root
    let offset = match (left.root_box(), right.root_box()) {
        (Some(l), Some(r)) => Some((l.x - r.x, l.y - r.y)),
        _ => None,
    };
    if let (Some((dx, dy)), Some(idx)) = (offset, right.arena.root()) {
        right.arena.translate(idx, dx, dy);
    }

    for half in [&mut left, &mut right] {
        half.apply_depth_offset(spacing.depth_offset);
    }
    let (origin_x, origin_y) = left.root_box().map(|b| (b.x, b.y)).unwrap_or((0.0, 0.0));

    let Some(mut positioned) = left
        .arena
        .root()
        .and_then(|idx| left.to_positioned(idx, origin_x, origin_y))
    else {
        return empty_root(root, measure, spacing);
    };
    let mut left_branches = left.branches.iter();
    let mut right_branches = right.branches.iter();
    positioned.children = sides
        .iter()
        .filter_map(|side| match side {
            Side::Left => left_branches
                .next()
                .and_then(|&idx| left.to_positioned(idx, origin_x, origin_y)),
            Side::Right => right_branches
                .next()
                .and_then(|&idx| right.to_positioned(idx, origin_x, origin_y)),
        })
        .collect();

    debug!(nodes = positioned.iter().count(), "layout computed");
    positioned
}

/// Side of each direct child of `root`, in child order.
///
/// Children without a side fall back to index order: the first half (rounded
/// up) goes right, the rest left.
pub fn partition_sides(root: &TopicNode) -> Vec<Side> {
    let right_count = root.child_count().div_ceil(2);
    root.children()
        .enumerate()
        .map(|(i, child)| {
            child.side.unwrap_or(if i < right_count {
                Side::Right
            } else {
                Side::Left
            })
        })
        .collect()
}

/// One half of the mind map: the root plus the branches of one side.
struct SideTree {
    side: Side,
    arena: LayoutArena,
    /// Arena index of each branch, in root child order.
    branches: Vec<Index>,
}

impl SideTree {
    fn root_box(&self) -> Option<&LayoutBox> {
        self.arena
            .root()
            .and_then(|idx| self.arena.get_node(idx))
            .map(|n| &n.data)
    }

    fn apply_depth_offset(&mut self, depth_offset: f64) {
        let sign = self.side.sign();
        let order: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in order {
            if let Some(node) = self.arena.get_node_mut(idx) {
                node.data.x += sign * depth_offset * node.data.depth as f64;
            }
        }
    }

    fn to_positioned(&self, idx: Index, origin_x: f64, origin_y: f64) -> Option<PositionedNode> {
        let node = self.arena.get_node(idx)?;
        let b = &node.data;
        Some(PositionedNode {
            id: b.id.clone(),
            title: b.title.clone(),
            side: b.side,
            depth: b.depth,
            x: b.x - origin_x,
            y: b.y - origin_y,
            width: b.width,
            height: b.height,
            content_width: b.content_width,
            content_height: b.content_height,
            hgap: b.hgap,
            vgap: b.vgap,
            children: node
                .children
                .iter()
                .filter_map(|&child| self.to_positioned(child, origin_x, origin_y))
                .collect(),
        })
    }
}

fn side_arena(
    root: &TopicNode,
    sides: &[Side],
    side: Side,
    measure: &dyn TextMeasure,
    spacing: &Spacing,
) -> SideTree {
    let mut arena = LayoutArena::new();
    let root_idx = arena.insert_node(topic_box(root, 0, None, measure, spacing), None);
    let mut branches = Vec::new();
    for (child, &child_side) in root.children().zip(sides) {
        if child_side == side {
            branches.push(insert_subtree(&mut arena, child, root_idx, 1, side, measure, spacing));
        }
    }
    SideTree {
        side,
        arena,
        branches,
    }
}

fn insert_subtree(
    arena: &mut LayoutArena,
    node: &TopicNode,
    parent: Index,
    depth: usize,
    side: Side,
    measure: &dyn TextMeasure,
    spacing: &Spacing,
) -> Index {
    let data = topic_box(node, depth, Some(side), measure, spacing);
    let idx = arena.insert_node(data, Some(parent));
    for child in node.children() {
        insert_subtree(arena, child, idx, depth + 1, side, measure, spacing);
    }
    idx
}

fn topic_box(
    node: &TopicNode,
    depth: usize,
    side: Option<Side>,
    measure: &dyn TextMeasure,
    spacing: &Spacing,
) -> LayoutBox {
    let size = size_topic(&node.title, measure, spacing);
    let hgap = spacing.padding;
    let vgap = if node.is_leaf() { 0.0 } else { spacing.padding };
    LayoutBox {
        id: node.id.clone(),
        title: node.title.clone(),
        side,
        depth,
        content_width: size.content_width,
        content_height: size.content_height,
        hgap,
        vgap,
        width: size.content_width + 2.0 * hgap,
        height: size.content_height + 2.0 * spacing.vertical_padding(),
        x: 0.0,
        y: 0.0,
        start_y: 0.0,
        total_height: 0.0,
    }
}

fn geometry(arena: &LayoutArena, idx: Index) -> Option<&LayoutBox> {
    arena.get_node(idx).map(|n| &n.data)
}

fn geometry_mut(arena: &mut LayoutArena, idx: Index) -> Option<&mut LayoutBox> {
    arena.get_node_mut(idx).map(|n| &mut n.data)
}

fn children_of(arena: &LayoutArena, idx: Index) -> Vec<Index> {
    arena
        .get_node(idx)
        .map(|n| n.children.clone())
        .unwrap_or_default()
}

/// Right-growing tree placement on an arena rooted at `arena.root()`.
fn stack_tree(arena: &mut LayoutArena) {
    let Some(root) = arena.root() else {
        return;
    };
    let preorder: Vec<Index> = arena.iter().map(|(idx, _)| idx).collect();
    let postorder: Vec<Index> = arena.iter_postorder().map(|(idx, _)| idx).collect();

    // x: children start at the parent's right edge
    for &idx in &preorder {
        let parent_edge = arena
            .get_node(idx)
            .and_then(|n| n.parent)
            .and_then(|p| geometry(arena, p))
            .map(|p| p.x + p.width)
            .unwrap_or(0.0);
        if let Some(b) = geometry_mut(arena, idx) {
            b.x = parent_edge;
        }
    }

    // subtree heights, bottom-up
    for &idx in &postorder {
        let children = children_of(arena, idx);
        let stacked: f64 = children
            .iter()
            .filter_map(|&c| geometry(arena, c))
            .map(|c| c.total_height)
            .sum();
        if let Some(b) = geometry_mut(arena, idx) {
            let inner = if children.is_empty() { b.height } else { stacked };
            b.total_height = b.height.max(inner) + 2.0 * b.vgap;
        }
    }

    // initial y: stack sibling subtrees top-down
    if let Some(b) = geometry_mut(arena, root) {
        b.start_y = 0.0;
        b.y = b.total_height / 2.0 - b.height / 2.0;
    }
    for &idx in &preorder {
        let children = children_of(arena, idx);
        let Some(parent) = geometry(arena, idx).cloned() else {
            continue;
        };
        let mut previous: Option<(f64, f64)> = None;
        for (i, &child) in children.iter().enumerate() {
            let Some(c) = geometry_mut(arena, child) else {
                continue;
            };
            c.start_y = match previous {
                None => parent.start_y + parent.vgap,
                Some((start, total)) => start + total,
            };
            c.y = if children.len() == 1 && i == 0 {
                parent.y + parent.height / 2.0 - c.height / 2.0
            } else {
                c.start_y + c.total_height / 2.0 - c.height / 2.0
            };
            previous = Some((c.start_y, c.total_height));
        }
    }

    // center parents against their children, bottom-up
    for &idx in &postorder {
        let children = children_of(arena, idx);
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            continue;
        };
        let (Some(f), Some(l), Some(node)) = (
            geometry(arena, first).cloned(),
            geometry(arena, last).cloned(),
            geometry(arena, idx).cloned(),
        ) else {
            continue;
        };
        let span = l.y - f.y + l.height;
        let stacked: f64 = children
            .iter()
            .filter_map(|&c| geometry(arena, c))
            .map(|c| c.total_height)
            .sum();

        if span > node.height {
            if let Some(b) = geometry_mut(arena, idx) {
                b.y = f.y + span / 2.0 - b.height / 2.0;
            }
        } else if children.len() != 1 || node.height > stacked {
            let offset = node.y + (node.height - span) / 2.0 - f.y;
            for &child in &children {
                arena.translate(child, 0.0, offset);
            }
        } else if let Some(b) = geometry_mut(arena, idx) {
            b.y = (f.y + f.height / 2.0 + l.y + l.height / 2.0) / 2.0 - b.height / 2.0;
        }
    }
}

fn empty_root(root: &TopicNode, measure: &dyn TextMeasure, spacing: &Spacing) -> PositionedNode {
    let b = topic_box(root, 0, None, measure, spacing);
    PositionedNode {
        id: b.id,
        title: b.title,
        side: None,
        depth: 0,
        x: 0.0,
        y: 0.0,
        width: b.width,
        height: b.height,
        content_width: b.content_width,
        content_height: b.content_height,
        hgap: b.hgap,
        vgap: b.vgap,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(width: f64) -> impl Fn(&str, f64) -> TextMetrics {
        move |_: &str, _: f64| TextMetrics { width }
    }

    #[test]
    fn given_zero_width_title_when_sizing_then_one_line_min_height() {
        let spacing = Spacing::default();
        let size = size_topic("", &fixed(0.0), &spacing);
        assert_eq!(size.lines, 1);
        assert_eq!(size.content_width, 0.0);
        assert_eq!(size.content_height, spacing.min_topic_height);
    }

    #[test]
    fn given_unsided_children_when_partitioning_then_first_half_goes_right() {
        let root = TopicNode::new("r", "r")
            .with_child(TopicNode::new("a", "a"))
            .with_child(TopicNode::new("b", "b"))
            .with_child(TopicNode::new("c", "c").with_side(Side::Right));
        assert_eq!(
            partition_sides(&root),
            vec![Side::Right, Side::Right, Side::Right]
        );
        let root = TopicNode::new("r", "r")
            .with_child(TopicNode::new("a", "a"))
            .with_child(TopicNode::new("b", "b"))
            .with_child(TopicNode::new("c", "c"));
        assert_eq!(
            partition_sides(&root),
            vec![Side::Right, Side::Right, Side::Left]
        );
    }

    #[test]
    fn given_single_leaf_child_when_stacking_then_child_is_centered_on_parent() {
        let root =
            TopicNode::new("r", "r").with_child(TopicNode::new("a", "a").with_side(Side::Right));
        let spacing = Spacing::default();
        let out = layout(&root, &fixed(50.0), &spacing);
        let child = &out.children[0];
        assert_eq!(child.y + child.height / 2.0, out.y + out.height / 2.0);
    }
}
