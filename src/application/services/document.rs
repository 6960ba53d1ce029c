//! Document store
//!
//! Single-writer container for the topic tree history. Every edit first
//! truncates the redo branch, pushes a shared copy of the current snapshot
//! and then mutates only that copy; undo and redo just move the cursor.
//!
//! ```text
//! dispatch(edit) at cursor 1 of [s0, s1, s2]
//!   truncate   -> [s0, s1]
//!   push clone -> [s0, s1, s1']   cursor = 2
//!   mutate s1' (path copy, s1 untouched)
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::domain::walker::{
    balanced_side, contains, get_descendants, get_node, node_at_path_mut, path_to,
};
use crate::domain::{walker, DomainError, DomainResult, TopicId, TopicNode, TopicPatch};

pub const DEFAULT_ROOT_TITLE: &str = "Central Topic";

/// Structural intents accepted by [`DocumentStore::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append `node` as last child of `parent`.
    AppendChild { parent: TopicId, node: TopicNode },
    /// Remove a non-root topic and its subtree.
    DeleteNode(TopicId),
    /// Shallow-merge `patch` into a topic.
    UpdateNode { id: TopicId, patch: TopicPatch },
    /// Re-parent a topic (drag and drop).
    MoveNode { id: TopicId, parent: TopicId },
    Undo,
    Redo,
    /// Internal history step. Rejected when dispatched from outside.
    SaveSnapshot,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AppendChild { .. } => "AppendChild",
            Action::DeleteNode(_) => "DeleteNode",
            Action::UpdateNode { .. } => "UpdateNode",
            Action::MoveNode { .. } => "MoveNode",
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::SaveSnapshot => "SaveSnapshot",
        }
    }
}

/// Receiver of store notifications.
pub trait DocumentListener {
    /// Called with the current tree after every accepted dispatch.
    fn on_change(&mut self, root: &TopicNode);

    /// Called when a dispatch wants the selection moved to `id`.
    fn on_select(&mut self, _id: &TopicId) {}
}

impl<F: FnMut(&TopicNode)> DocumentListener for F {
    fn on_change(&mut self, root: &TopicNode) {
        self(root)
    }
}

/// Versioned topic tree with linear undo/redo.
pub struct DocumentStore {
    timeline: Vec<Arc<TopicNode>>,
    current: usize,
    readonly: bool,
    listener: Option<Box<dyn DocumentListener>>,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("timeline_len", &self.timeline.len())
            .field("current", &self.current)
            .field("readonly", &self.readonly)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(walker::default_root(DEFAULT_ROOT_TITLE))
    }
}

impl DocumentStore {
    /// Create a store whose timeline holds only `root`.
    pub fn new(root: TopicNode) -> Self {
        Self {
            timeline: vec![Arc::new(root)],
            current: 0,
            readonly: false,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: impl DocumentListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn set_listener(&mut self, listener: impl DocumentListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Tree at the cursor.
    pub fn current(&self) -> &TopicNode {
        &self.timeline[self.current]
    }

    /// Shared handle to the tree at the cursor.
    pub fn snapshot(&self) -> Arc<TopicNode> {
        Arc::clone(&self.timeline[self.current])
    }

    pub fn timeline(&self) -> &[Arc<TopicNode>] {
        &self.timeline
    }

    pub fn cursor(&self) -> usize {
        self.current
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline.len()
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.timeline.len()
    }

    /// Apply one action.
    ///
    /// Invalid references and structural violations leave the state
    /// unchanged and are only logged. Readonly stores and the reserved
    /// snapshot action return without notifying the listener.
    #[instrument(level = "debug", skip(self, action), fields(action = action.name()))]
    pub fn dispatch(&mut self, action: Action) {
        if self.readonly {
            debug!(error = %DomainError::Readonly, "dispatch ignored");
            return;
        }
        debug!(cursor = self.current, len = self.timeline.len(), "dispatch");

        match self.apply(action) {
            Ok(Some(selected)) => {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_select(&selected);
                }
            }
            Ok(None) => {}
            Err(e @ DomainError::ReservedAction(_)) => {
                warn!("{}", e);
                return;
            }
            Err(e) => debug!(error = %e, "action rejected"),
        }

        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(&self.timeline[self.current]);
        }
    }

    /// Returns the topic to select, if the action asks for one.
    fn apply(&mut self, action: Action) -> DomainResult<Option<TopicId>> {
        match action {
            Action::AppendChild { parent, node } => self.append_child(&parent, node).map(|_| None),
            Action::DeleteNode(id) => self.delete_node(&id).map(Some),
            Action::UpdateNode { id, patch } => self.update_node(&id, patch).map(|_| None),
            Action::MoveNode { id, parent } => self.move_node(&id, &parent).map(Some),
            Action::Undo => {
                self.current = self.current.saturating_sub(1);
                Ok(None)
            }
            Action::Redo => {
                self.current = (self.current + 1).min(self.timeline.len() - 1);
                Ok(None)
            }
            Action::SaveSnapshot => Err(DomainError::ReservedAction("SaveSnapshot")),
        }
    }

    /// Truncate the redo branch and push a shared copy of the current tree.
    /// Returns the new head for mutation.
    fn save_snapshot(&mut self) -> &mut TopicNode {
        self.timeline.truncate(self.current + 1);
        let head = Arc::clone(&self.timeline[self.current]);
        self.timeline.push(head);
        self.current = self.timeline.len() - 1;
        trace!(cursor = self.current, "snapshot saved");
        Arc::make_mut(&mut self.timeline[self.current])
    }

    fn append_child(&mut self, parent: &TopicId, mut node: TopicNode) -> DomainResult<()> {
        let root = self.current();
        let parent_path =
            path_to(root, parent).ok_or_else(|| DomainError::UnknownTopic(parent.clone()))?;
        validate_attach(root, parent, &node)?;

        if parent_path.is_empty() {
            node.side = Some(balanced_side(root));
        } else {
            node.side = None;
        }

        let head = self.save_snapshot();
        let target = node_at_path_mut(head, &parent_path)
            .ok_or_else(|| DomainError::UnknownTopic(parent.clone()))?;
        target.children.attached.push(Arc::new(node));
        Ok(())
    }

    fn delete_node(&mut self, id: &TopicId) -> DomainResult<TopicId> {
        let path =
            path_to(self.current(), id).ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        let Some((&index, parent_path)) = path.split_last() else {
            return Err(DomainError::RootImmutable);
        };

        let head = self.save_snapshot();
        let parent = node_at_path_mut(head, parent_path)
            .ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        parent.children.attached.remove(index);

        let siblings = &parent.children.attached;
        let successor = siblings
            .get(index)
            .or_else(|| index.checked_sub(1).and_then(|i| siblings.get(i)))
            .or_else(|| siblings.get(index + 1))
            .map(|n| n.id.clone())
            .unwrap_or_else(|| parent.id.clone());
        debug!(deleted = %id, select = %successor, "topic deleted");
        Ok(successor)
    }

    fn update_node(&mut self, id: &TopicId, patch: TopicPatch) -> DomainResult<()> {
        let path =
            path_to(self.current(), id).ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        let root_child = path.len() == 1;

        let head = self.save_snapshot();
        let node =
            node_at_path_mut(head, &path).ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        if let Some(title) = patch.title {
            node.title = title;
        }
        match patch.side {
            Some(side) if root_child => node.side = Some(side),
            Some(_) => trace!(id = %id, "side ignored below root level"),
            None => {}
        }
        Ok(())
    }

    fn move_node(&mut self, id: &TopicId, new_parent: &TopicId) -> DomainResult<TopicId> {
        let root = self.current();
        if &root.id == id {
            return Err(DomainError::RootImmutable);
        }
        let path = path_to(root, id).ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        if !contains(root, new_parent) {
            return Err(DomainError::UnknownTopic(new_parent.clone()));
        }
        let moving = get_node(root, id).ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        if is_self_or_descendant(moving, new_parent) {
            return Err(DomainError::CycleDetected {
                node: id.clone(),
                parent: new_parent.clone(),
            });
        }
        let Some((&index, old_parent_path)) = path.split_last() else {
            return Err(DomainError::RootImmutable);
        };

        let head = self.save_snapshot();
        let old_parent = node_at_path_mut(head, old_parent_path)
            .ok_or_else(|| DomainError::UnknownTopic(id.clone()))?;
        let mut moved = old_parent.children.attached.remove(index);

        // indices may have shifted after the removal
        let parent_path = path_to(head, new_parent)
            .ok_or_else(|| DomainError::UnknownTopic(new_parent.clone()))?;
        let side = if parent_path.is_empty() {
            Some(balanced_side(head))
        } else {
            None
        };
        if moved.side != side {
            Arc::make_mut(&mut moved).side = side;
        }
        let target = node_at_path_mut(head, &parent_path)
            .ok_or_else(|| DomainError::UnknownTopic(new_parent.clone()))?;
        target.children.attached.push(moved);
        debug!(moved = %id, parent = %new_parent, "topic moved");
        Ok(id.clone())
    }
}

fn is_self_or_descendant(node: &TopicNode, id: &TopicId) -> bool {
    &node.id == id || get_descendants(node).iter().any(|d| &d.id == id)
}

/// Refuse attaching `node` under `parent` when that would create a cycle or
/// duplicate an id, either one already in `root` or one repeated inside `node`.
fn validate_attach(root: &TopicNode, parent: &TopicId, node: &TopicNode) -> DomainResult<()> {
    if is_self_or_descendant(node, parent) {
        return Err(DomainError::CycleDetected {
            node: node.id.clone(),
            parent: parent.clone(),
        });
    }
    let mut seen = HashSet::new();
    for (_, n) in walker::iter(node) {
        if !seen.insert(&n.id) || contains(root, &n.id) {
            return Err(DomainError::DuplicateTopic(n.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::walker::create_topic;

    #[test]
    fn given_edit_when_dispatched_then_previous_snapshot_is_untouched() {
        let mut store = DocumentStore::default();
        let before = store.snapshot();
        let root_id = before.id.clone();

        store.dispatch(Action::AppendChild {
            parent: root_id,
            node: create_topic("new"),
        });

        assert_eq!(store.timeline_len(), 2);
        assert_eq!(before.child_count(), 2);
        assert_eq!(store.current().child_count(), 3);
        assert!(Arc::ptr_eq(&store.timeline()[0], &before));
        // untouched siblings are shared between snapshots
        assert!(Arc::ptr_eq(
            &store.timeline()[0].children.attached[0],
            &store.timeline()[1].children.attached[0]
        ));
    }

    #[test]
    fn given_reserved_action_when_dispatched_then_nothing_changes() {
        let mut store = DocumentStore::default();
        store.dispatch(Action::SaveSnapshot);
        assert_eq!(store.timeline_len(), 1);
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn given_empty_patch_when_updating_then_snapshot_equals_previous() {
        let mut store = DocumentStore::default();
        let id = store.current().id.clone();
        store.dispatch(Action::UpdateNode {
            id,
            patch: TopicPatch::default(),
        });
        assert_eq!(store.timeline_len(), 2);
        assert_eq!(store.timeline()[0].as_ref(), store.timeline()[1].as_ref());
    }
}
