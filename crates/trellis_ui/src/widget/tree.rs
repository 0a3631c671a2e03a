//! Tree structure: creation, attach/detach, reordering and traversal.
//!
//! Parents own their children through an ordered list; the parent link on a
//! child is only used for traversal. Attaching a subtree to the scene (as a
//! root, or under an attached parent) sets the `ATTACHED` flag on every node
//! in it. Detaching clears it, aborts animations, and drops focus, hover
//! and press state held inside the subtree.

use crate::layout::LayoutAttr;
use crate::scene::Scene;

use super::{Node, NodeFlags, NodeId, Widget};

impl Scene {
    /// Creates a detached plain node.
    pub fn create_node(&mut self) -> NodeId {
        let id = self.allocate_id();
        self.nodes.insert(id, Node::new(id, None));
        id
    }

    /// Creates a detached node driven by `widget`.
    pub fn create_widget<W: Widget + 'static>(&mut self, widget: W) -> NodeId {
        let id = self.allocate_id();
        self.nodes.insert(id, Node::new(id, Some(Box::new(widget))));
        id
    }

    /// Adds a parentless node as the last root. Returns false if it is
    /// unknown, already a root, or has a parent.
    pub fn add_root(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if node.parent.is_some() || self.roots.contains(&id) {
            return false;
        }
        self.roots.push(id);
        self.attach_subtree(id);
        self.refresh_absolute(id);
        tracing::debug!(node = %id, "root attached");
        true
    }

    /// Appends `child` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.add_child_with_attr(parent, child, None)
    }

    /// Appends `child` under `parent` with a layout attribute.
    ///
    /// Returns false if either node is unknown, `child` already has a
    /// parent or is a root, or the link would create a cycle. On success the
    /// parent's layout runs and absolute bounds are refreshed.
    pub fn add_child_with_attr(&mut self, parent: NodeId, child: NodeId, attr: Option<LayoutAttr>) -> bool {
        if parent == child || !self.nodes.contains_key(&parent) {
            return false;
        }
        let Some(node) = self.nodes.get(&child) else {
            return false;
        };
        if node.parent.is_some() || self.roots.contains(&child) || self.is_ancestor(child, parent) {
            return false;
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.layout_attr = attr;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if self.is_attached(parent) {
            self.attach_subtree(child);
        }
        self.resize_children(parent);
        self.refresh_absolute(parent);
        tracing::trace!(parent = %parent, child = %child, "child added");
        true
    }

    /// Removes `child` from `parent`. The child keeps its own subtree and
    /// can be added again.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let is_child = self
            .nodes
            .get(&parent)
            .is_some_and(|node| node.children.contains(&child));
        if !is_child {
            return false;
        }

        if self.is_attached(child) {
            self.detach_subtree(child);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        self.resize_children(parent);
        self.refresh_absolute(parent);
        self.refresh_absolute(child);
        tracing::trace!(parent = %parent, child = %child, "child removed");
        true
    }

    /// Detaches a node from its parent or from the root list.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        match self.nodes.get(&id).map(|node| node.parent) {
            Some(Some(parent)) => self.remove_child(parent, id),
            Some(None) => self.remove_root(id),
            None => false,
        }
    }

    fn remove_root(&mut self, id: NodeId) -> bool {
        if !self.roots.contains(&id) {
            return false;
        }
        self.detach_subtree(id);
        self.roots.retain(|&r| r != id);
        tracing::debug!(node = %id, "root detached");
        true
    }

    /// Detaches a node and frees it together with its whole subtree.
    pub fn destroy_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.remove_node(id);
        let doomed: Vec<NodeId> = self.subtree(id).collect();
        for id in &doomed {
            if let Some(node) = self.nodes.remove(id) {
                for name in &node.names {
                    self.unindex_name(*id, name);
                }
            }
            self.animations.remove(id);
        }
        tracing::debug!(node = %id, freed = doomed.len(), "subtree destroyed");
        true
    }

    fn attach_subtree(&mut self, id: NodeId) {
        let members: Vec<NodeId> = self.subtree(id).collect();
        for member in members {
            if let Some(node) = self.nodes.get_mut(&member) {
                node.flags.set(NodeFlags::ATTACHED);
            }
        }
    }

    fn detach_subtree(&mut self, id: NodeId) {
        let members: Vec<NodeId> = self.subtree(id).collect();
        if self.router.focused.is_some_and(|focused| members.contains(&focused)) {
            self.request_focus(None);
        }
        for member in &members {
            if self.animations.remove(member).is_some() {
                tracing::trace!(node = %member, "animation aborted on detach");
            }
            if let Some(node) = self.nodes.get_mut(member) {
                node.flags.clear(NodeFlags::ATTACHED);
                node.paint_order = -1;
            }
        }
        self.router.forget(&members);
    }

    /// Returns true if the node is part of the live scene tree.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_attached)
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Children of a node in sibling order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of ancestors above a node.
    #[must_use]
    pub fn generation(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Sibling indices from the root list down to `id`. Paths compare in
    /// pre-order.
    pub(crate) fn tree_path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        loop {
            let siblings = match self.parent(current) {
                Some(parent) => self.children(parent),
                None => self.roots.as_slice(),
            };
            path.push(siblings.iter().position(|&s| s == current).unwrap_or(0));
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// All attached nodes in pre-order, roots in sibling order.
    #[must_use]
    pub fn iter_dfs(&self) -> DepthFirst<'_> {
        DepthFirst {
            scene: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// A node and its descendants in pre-order.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> DepthFirst<'_> {
        let stack = if self.nodes.contains_key(&id) { vec![id] } else { Vec::new() };
        DepthFirst { scene: self, stack }
    }

    /// Swaps a node with the sibling after it (paints later).
    pub fn move_up(&mut self, id: NodeId) -> bool {
        self.reorder(id, |index, len| (index + 1 < len).then_some(index + 1))
    }

    /// Swaps a node with the sibling before it (paints earlier).
    pub fn move_down(&mut self, id: NodeId) -> bool {
        self.reorder(id, |index, _| index.checked_sub(1))
    }

    /// Makes a node the last sibling, painting over the others.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        self.reorder(id, |_, len| Some(len - 1))
    }

    /// Makes a node the first sibling, painting under the others.
    pub fn move_to_back(&mut self, id: NodeId) -> bool {
        self.reorder(id, |_, _| Some(0))
    }

    fn reorder(&mut self, id: NodeId, target: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        let siblings = match self.nodes.get(&id).map(|node| node.parent) {
            Some(Some(parent)) => match self.nodes.get_mut(&parent) {
                Some(node) => &mut node.children,
                None => return false,
            },
            Some(None) => &mut self.roots,
            None => return false,
        };
        let Some(index) = siblings.iter().position(|&c| c == id) else {
            return false;
        };
        let Some(to) = target(index, siblings.len()) else {
            return false;
        };
        if to == index {
            return false;
        }
        let moved = siblings.remove(index);
        siblings.insert(to, moved);
        true
    }
}

/// Depth-first (pre-order) iterator over a scene tree.
pub struct DepthFirst<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Reverse push keeps siblings left-to-right.
        if let Some(node) = self.scene.nodes.get(&id) {
            self.stack.extend(node.children.iter().rev().copied());
        }

        Some(id)
    }
}
