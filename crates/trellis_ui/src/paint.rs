//! Paint pass and the viewport seam.
//!
//! Once per tick the renderer calls [`Scene::paint_pass`]: animations advance,
//! paint order is reassigned by a pre-order walk of the roots, hover is
//! re-evaluated against the new order, and the painted nodes come back as a
//! flat [`PaintItem`] list ready for upload.

use bytemuck::{Pod, Zeroable};

use crate::layout::{Point, Rect};
use crate::scene::Scene;
use crate::widget::{NodeFlags, NodeId};

/// Maps device coordinates to scene coordinates.
pub trait Viewport: Send + Sync {
    /// Converts a canvas position to scene units.
    fn to_scene(&self, canvas: Point) -> Point;

    /// Converts a canvas movement delta to scene units.
    fn scale_movement(&self, movement: Point) -> Point;

    /// True if a scene-space rectangle is at least partly visible.
    fn is_on_screen(&self, rect: &Rect) -> bool;
}

/// A viewport that stretches a fixed scene size over the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    canvas_width: f32,
    canvas_height: f32,
    scene_width: f32,
    scene_height: f32,
}

impl CanvasViewport {
    /// One scene unit per canvas pixel.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_scene_size(width, height, width, height)
    }

    /// A scene of `scene_width` x `scene_height` units shown on a canvas of
    /// the given pixel size.
    #[must_use]
    pub fn with_scene_size(canvas_width: f32, canvas_height: f32, scene_width: f32, scene_height: f32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            scene_width,
            scene_height,
        }
    }

    fn scale(&self) -> (f32, f32) {
        let sx = if self.canvas_width == 0.0 { 1.0 } else { self.scene_width / self.canvas_width };
        let sy = if self.canvas_height == 0.0 { 1.0 } else { self.scene_height / self.canvas_height };
        (sx, sy)
    }
}

impl Viewport for CanvasViewport {
    fn to_scene(&self, canvas: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(canvas.x * sx, canvas.y * sy)
    }

    fn scale_movement(&self, movement: Point) -> Point {
        self.to_scene(movement)
    }

    fn is_on_screen(&self, rect: &Rect) -> bool {
        rect.intersects(&Rect::new(0.0, 0.0, self.scene_width, self.scene_height))
    }
}

/// Everything a renderer needs to draw one node.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PaintItem {
    /// Absolute rectangle (x, y, width, height).
    pub rect: [f32; 4],
    /// Effective color, alpha including inherited opacity.
    pub color: [f32; 4],
    /// Skin texture scale (s, t).
    pub skin_scale: [f32; 2],
    /// Rotation in degrees.
    pub rotation: f32,
    /// Culling radius for rotated nodes.
    pub radius: f32,
    /// Paint order; items arrive sorted by it.
    pub paint_order: i32,
    /// Skin handle, [`PaintItem::NO_SKIN`] if none.
    pub skin: u32,
    /// Raw node id.
    pub node: u64,
}

impl PaintItem {
    /// Marker for nodes drawn without a skin.
    pub const NO_SKIN: u32 = u32::MAX;

    /// Node this item draws.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.node)
    }
}

impl Scene {
    /// Reassigns paint order by a pre-order walk of the roots.
    ///
    /// Nodes that are hidden or fully transparent are skipped together with
    /// their subtrees and keep order -1, as do detached nodes. Returns the
    /// number of nodes painted.
    pub fn assign_paint_order(&mut self) -> usize {
        for node in self.nodes.values_mut() {
            node.paint_order = -1;
        }

        let mut next = 0_i32;
        let mut stack: Vec<(NodeId, f32)> = self.roots.iter().rev().map(|&r| (r, 1.0)).collect();
        while let Some((id, inherited)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let opacity = inherited * node.opacity;
            if !node.flags.has(NodeFlags::VISIBLE) || opacity <= 0.0 {
                continue;
            }
            node.paint_order = next;
            next += 1;
            stack.extend(node.children.iter().rev().map(|&c| (c, opacity)));
        }

        tracing::trace!(painted = next, "paint order assigned");
        usize::try_from(next).unwrap_or_default()
    }

    /// Paint order from the last paint pass, -1 if not painted.
    #[must_use]
    pub fn paint_order(&self, id: NodeId) -> i32 {
        self.nodes.get(&id).map_or(-1, |node| node.paint_order)
    }

    /// Overrides a node's paint order until the next paint pass.
    pub fn set_paint_order(&mut self, id: NodeId, order: i32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.paint_order = order;
        }
    }

    /// Runs one paint tick and returns the painted nodes in paint order.
    ///
    /// `delta` is the frame time in milliseconds; animations advance by it
    /// when `animate_during_paint` is on.
    pub fn paint_pass(&mut self, delta: f32) -> Vec<PaintItem> {
        if self.config.animate_during_paint {
            self.update_animations(delta);
        }
        self.assign_paint_order();
        if self.router.pointer_inside && self.router.accepts_input {
            self.refresh_hover();
        }

        let mut items: Vec<PaintItem> = self
            .nodes
            .values()
            .filter(|node| node.paint_order >= 0)
            .filter_map(|node| self.paint_item(node.id))
            .collect();
        items.sort_by_key(|item| item.paint_order);
        items
    }

    /// Paint record for one node.
    #[must_use]
    pub fn paint_item(&self, id: NodeId) -> Option<PaintItem> {
        let node = self.nodes.get(&id)?;
        let a = node.absolute;
        let (s, t) = self.skin_scale(id);
        Some(PaintItem {
            rect: [a.x, a.y, a.width, a.height],
            color: self.effective_color(id).to_array(),
            skin_scale: [s, t],
            rotation: node.rotation,
            radius: self.render_radius(id),
            paint_order: node.paint_order,
            skin: self.skin(id).map_or(PaintItem::NO_SKIN, |skin| skin.0),
            node: id.raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;

    fn scene() -> Scene {
        Scene::new(CanvasViewport::new(100.0, 100.0))
    }

    #[test]
    fn test_paint_order_is_preorder() {
        let mut scene = scene();
        let r1 = scene.create_node();
        let r2 = scene.create_node();
        let child = scene.create_node();
        scene.add_root(r1);
        scene.add_root(r2);
        scene.add_child(r1, child);

        assert_eq!(scene.assign_paint_order(), 3);
        assert_eq!(scene.paint_order(r1), 0);
        assert_eq!(scene.paint_order(child), 1);
        assert_eq!(scene.paint_order(r2), 2);
    }

    #[test]
    fn test_hidden_subtree_is_not_painted() {
        let mut scene = scene();
        let root = scene.create_node();
        let panel = scene.create_node();
        let label = scene.create_node();
        let loose = scene.create_node();
        scene.add_root(root);
        scene.add_child(root, panel);
        scene.add_child(panel, label);
        scene.set_opacity(panel, 0.0);

        scene.assign_paint_order();
        assert_eq!(scene.paint_order(root), 0);
        assert_eq!(scene.paint_order(panel), -1);
        assert_eq!(scene.paint_order(label), -1);
        assert_eq!(scene.paint_order(loose), -1);
    }

    #[test]
    fn test_paint_pass_advances_and_sorts() {
        let mut scene = scene();
        let a = scene.create_node();
        let b = scene.create_node();
        scene.add_root(a);
        scene.add_root(b);
        scene.set_bounds(b, Rect::new(10.0, 20.0, 30.0, 40.0));
        scene.animate(a, 100.0, vec![Animation::opacity(0.0)]);

        let items = scene.paint_pass(50.0);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].node_id(), a);
        assert!((items[0].color[3] - 0.5).abs() < 1e-5);
        assert_eq!(items[1].rect, [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(items[1].skin, PaintItem::NO_SKIN);

        let items = scene.paint_pass(50.0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].node_id(), b);
        assert_eq!(items[0].paint_order, 0);
    }

    #[test]
    fn test_paint_item_is_plain_data() {
        assert_eq!(std::mem::size_of::<PaintItem>(), 64);
        let item = PaintItem::zeroed();
        assert_eq!(bytemuck::bytes_of(&item).len(), 64);
    }

    #[test]
    fn test_canvas_viewport_scales() {
        let viewport = CanvasViewport::with_scene_size(200.0, 100.0, 100.0, 100.0);
        assert_eq!(viewport.to_scene(Point::new(100.0, 50.0)), Point::new(50.0, 50.0));
        assert!(viewport.is_on_screen(&Rect::new(90.0, 90.0, 20.0, 20.0)));
        assert!(!viewport.is_on_screen(&Rect::new(100.0, 0.0, 5.0, 5.0)));
    }
}
