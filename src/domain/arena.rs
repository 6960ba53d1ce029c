use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::{Side, TopicId};

/// Geometry payload of a node being laid out.
///
/// `width`/`height` are the full box including gaps; `content_*` is the text
/// area alone. `start_y` and `total_height` are scratch values of the
/// vertical stacking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub id: TopicId,
    pub title: String,
    pub side: Option<Side>,
    pub depth: usize,
    pub content_width: f64,
    pub content_height: f64,
    pub hgap: f64,
    pub vgap: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub start_y: f64,
    pub total_height: f64,
}

impl fmt::Display for LayoutBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ ({:.1}, {:.1}) {:.1}x{:.1}",
            self.title, self.x, self.y, self.width, self.height
        )
    }
}

/// Node in the arena-based layout tree.
#[derive(Debug)]
pub struct LayoutNode {
    pub data: LayoutBox,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Axis-aligned extent of a set of boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Arena-based tree for the layout passes.
///
/// Parent and child links are indices, so a pass can walk the tree and
/// mutate geometry without fighting borrows of a nested structure.
#[derive(Debug)]
pub struct LayoutArena {
    arena: Arena<LayoutNode>,
    root: Option<Index>,
}

impl Default for LayoutArena {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: LayoutBox, parent: Option<Index>) -> Index {
        let node = LayoutNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&LayoutNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut LayoutNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Indices of `idx` and everything below it, pre-order.
    pub fn subtree(&self, idx: Index) -> Vec<Index> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                out.push(current);
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Shift `idx` and its whole subtree.
    pub fn translate(&mut self, idx: Index, dx: f64, dy: f64) {
        for current in self.subtree(idx) {
            if let Some(node) = self.get_node_mut(current) {
                node.data.x += dx;
                node.data.y += dy;
            }
        }
    }

    /// Extent of all boxes in the arena; `None` when empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.arena.iter().map(|(_, node)| &node.data).fold(None, |acc, b| {
            let here = BoundingBox {
                left: b.x,
                top: b.y,
                right: b.x + b.width,
                bottom: b.y + b.height,
            };
            Some(match acc {
                None => here,
                Some(bb) => BoundingBox {
                    left: bb.left.min(here.left),
                    top: bb.top.min(here.top),
                    right: bb.right.max(here.right),
                    bottom: bb.bottom.max(here.bottom),
                },
            })
        })
    }

    /// Mirror the whole tree horizontally inside its own bounding box.
    pub fn mirror_horizontally(&mut self) {
        let Some(bb) = self.bounding_box() else {
            return;
        };
        for (_, node) in self.arena.iter_mut() {
            let b = &mut node.data;
            b.x = bb.left + bb.right - b.x - b.width;
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a LayoutArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a LayoutArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a LayoutNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a LayoutArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a LayoutArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a LayoutNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
