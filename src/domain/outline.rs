use termtree::Tree;

use crate::domain::TopicNode;

/// Render a tree as a `termtree` outline.
pub trait TopicTreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TopicTreeConvert for TopicNode {
    fn to_tree_string(&self) -> Tree<String> {
        let label = match self.side {
            Some(side) => format!("{} [{}] ({})", self.title, side, self.id),
            None => format!("{} ({})", self.title, self.id),
        };
        let leaves: Vec<_> = self.children().map(|c| c.to_tree_string()).collect();
        Tree::new(label).with_leaves(leaves)
    }
}
