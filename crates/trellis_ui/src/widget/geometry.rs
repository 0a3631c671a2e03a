//! Local bounds, absolute bounds and layout propagation.
//!
//! Every bounds change ends with the node's absolute rectangle, and those of
//! its whole subtree, recomputed from the parent chain. Changes that touch
//! width or height also run the node's layout over its children.
//!
//! A layout must not resize the node it belongs to. The scene keeps the set
//! of nodes whose layout is currently running and rejects resizes of those
//! nodes with [`SceneError::ReentrantLayout`].

use std::sync::Arc;

use crate::error::SceneError;
use crate::layout::{Layout, LayoutAttr, Rect};
use crate::scene::Scene;

use super::{NodeFlags, NodeId};

impl Scene {
    /// Local bounds, or [`Rect::ZERO`] for unknown nodes.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Rect {
        self.nodes.get(&id).map_or(Rect::ZERO, |node| node.bounds)
    }

    /// Absolute bounds, or [`Rect::ZERO`] for unknown nodes.
    #[must_use]
    pub fn absolute_bounds(&self, id: NodeId) -> Rect {
        self.nodes.get(&id).map_or(Rect::ZERO, |node| node.absolute)
    }

    /// Replaces the local bounds and lays out the children.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        self.apply_bounds(id, bounds, true);
    }

    /// Moves the node without resizing it.
    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) {
        let b = self.bounds(id);
        self.apply_bounds(id, Rect::new(x, y, b.width, b.height), false);
    }

    /// Resizes the node in place and lays out the children.
    pub fn set_dimensions(&mut self, id: NodeId, width: f32, height: f32) {
        let b = self.bounds(id);
        self.apply_bounds(id, Rect::new(b.x, b.y, width, height), true);
    }

    /// Moves the node by an offset.
    pub fn translate(&mut self, id: NodeId, dx: f32, dy: f32) {
        let b = self.bounds(id);
        self.apply_bounds(id, Rect::new(b.x + dx, b.y + dy, b.width, b.height), false);
    }

    /// Grows (or shrinks) the node by a size delta and lays out the children.
    pub fn stretch(&mut self, id: NodeId, dw: f32, dh: f32) {
        let b = self.bounds(id);
        self.apply_bounds(id, Rect::new(b.x, b.y, b.width + dw, b.height + dh), true);
    }

    /// Sizes the node to the extent of its children, keeping its position.
    /// Does nothing for childless nodes.
    pub fn set_bounds_by_children(&mut self, id: NodeId) {
        let children = self.children(id);
        if children.is_empty() {
            return;
        }
        let (width, height) = children
            .iter()
            .map(|&child| self.bounds(child))
            .fold((0.0_f32, 0.0_f32), |(w, h), b| (w.max(b.right()), h.max(b.bottom())));
        self.set_dimensions(id, width, height);
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self, id: NodeId) -> f32 {
        self.nodes.get(&id).map_or(0.0, |node| node.rotation)
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation(&mut self, id: NodeId, degrees: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.rotation = degrees;
        }
    }

    /// Adds to the rotation.
    pub fn rotate(&mut self, id: NodeId, degrees: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.rotation += degrees;
        }
    }

    /// True if a renderer should cull this node by its radius instead of its
    /// rectangle.
    #[must_use]
    pub fn uses_render_radius(&self, id: NodeId) -> bool {
        self.rotation(id) != 0.0
    }

    /// Radius of the circle enclosing the node under any rotation.
    #[must_use]
    pub fn render_radius(&self, id: NodeId) -> f32 {
        self.bounds(id).half_diagonal()
    }

    /// Texture scale for the node's skin under its scale mode.
    #[must_use]
    pub fn skin_scale(&self, id: NodeId) -> (f32, f32) {
        self.nodes
            .get(&id)
            .map_or((1.0, 1.0), |node| node.scale_mode.skin_scale(node.bounds.width, node.bounds.height))
    }

    /// Installs or removes the node's layout, then lays out its children.
    pub fn set_layout(&mut self, id: NodeId, layout: Option<Arc<dyn Layout>>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.layout = layout;
        self.resize_children(id);
    }

    /// Sets the attribute the parent's layout reads for this node.
    pub fn set_layout_attr(&mut self, id: NodeId, attr: Option<LayoutAttr>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.layout_attr = attr;
        }
    }

    /// Layout attribute of a node.
    #[must_use]
    pub fn layout_attr(&self, id: NodeId) -> Option<&LayoutAttr> {
        self.nodes.get(&id).and_then(|node| node.layout_attr.as_ref())
    }

    /// Keeps the node inside its parent's rectangle from now on.
    pub fn set_constrain_to_parent(&mut self, id: NodeId, constrain: bool) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.flags.assign(NodeFlags::CONSTRAIN_TO_PARENT, constrain);
        if constrain {
            self.correct_position(id);
            self.refresh_absolute(id);
        }
    }

    /// True if the node is kept inside its parent's rectangle.
    #[must_use]
    pub fn is_constrained_to_parent(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.flags.has(NodeFlags::CONSTRAIN_TO_PARENT))
    }

    pub(crate) fn apply_bounds(&mut self, id: NodeId, bounds: Rect, relayout: bool) {
        if relayout && self.laying_out.contains(&id) {
            self.report(SceneError::ReentrantLayout { node: id });
            return;
        }
        let Some(node) = self.nodes.get_mut(&id) else {
            tracing::warn!(node = %id, "bounds change on unknown node");
            return;
        };
        node.bounds = bounds;
        self.correct_position(id);
        if relayout {
            self.resize_children(id);
        }
        self.refresh_absolute(id);
    }

    /// Runs the node's layout once per child, in sibling order, then lays
    /// out each child's own children.
    pub(crate) fn resize_children(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let Some(layout) = node.layout.clone() else {
            return;
        };
        let children = node.children.clone();
        if !self.laying_out.insert(id) {
            self.report(SceneError::ReentrantLayout { node: id });
            return;
        }

        let total = children.len();
        for (index, child) in children.into_iter().enumerate() {
            if self.parent(child) != Some(id) {
                continue;
            }
            layout.resize_child(self, id, child, index, total);
            self.correct_position(child);
            self.resize_children(child);
        }

        self.laying_out.remove(&id);
        self.refresh_absolute(id);
    }

    fn correct_position(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.flags.has(NodeFlags::CONSTRAIN_TO_PARENT) {
            return;
        }
        let Some(limit) = node.parent.and_then(|p| self.nodes.get(&p)).map(|p| p.bounds) else {
            return;
        };

        let mut b = node.bounds;
        if b.x < 0.0 {
            b.x = 0.0;
        } else if b.right() > limit.width {
            b.x = limit.width - b.width;
        }
        if b.y < 0.0 {
            b.y = 0.0;
        } else if b.bottom() > limit.height {
            b.y = limit.height - b.height;
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.bounds = b;
        }
    }

    /// Recomputes absolute bounds for a node and its subtree.
    pub(crate) fn refresh_absolute(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let origin = self
                .parent(current)
                .and_then(|p| self.nodes.get(&p))
                .map_or(Rect::ZERO, |p| p.absolute);
            let Some(node) = self.nodes.get_mut(&current) else {
                continue;
            };
            node.absolute = node.bounds.offset_by(&origin);
            stack.extend(node.children.iter().copied());
        }
    }
}
