//! Scene-side animation stepping.
//!
//! The scene keeps one [`AnimationQueue`] per animating node, created on the
//! first enqueue and removed once the queue drains. Each step snapshots the
//! set of animating nodes, so callbacks fired from an animation may enqueue
//! or abort animations on any node, including the one being stepped.

use crate::layout::Rect;
use crate::scene::Scene;
use crate::style::Color;
use crate::widget::NodeId;

use super::easing::Easing;
use super::property::{Animation, Effect, NodeSample};
use super::queue::{AnimationGroup, AnimationQueue};

impl Scene {
    /// Queues animations played together over `duration` ms with the
    /// configured default easing.
    ///
    /// Returns false (and queues nothing) if the node is not attached.
    pub fn animate(&mut self, id: NodeId, duration: f32, animations: Vec<Animation>) -> bool {
        let easing = self.config.default_easing;
        self.animate_eased(id, duration, easing, animations)
    }

    /// Queues animations with an explicit easing.
    pub fn animate_eased(
        &mut self,
        id: NodeId,
        duration: f32,
        easing: Easing,
        animations: Vec<Animation>,
    ) -> bool {
        self.enqueue_animation(id, AnimationGroup::new(duration, easing, animations))
    }

    /// Queues a pause of `duration` ms.
    pub fn animate_delay(&mut self, id: NodeId, duration: f32) -> bool {
        self.enqueue_animation(id, AnimationGroup::delay(duration))
    }

    /// Queues a prepared group.
    pub fn enqueue_animation(&mut self, id: NodeId, group: AnimationGroup) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        tracing::trace!(node = %id, duration = group.duration(), "animation queued");
        self.animations.entry(id).or_default().push(group);
        true
    }

    /// True while the node has queued or running animations.
    #[must_use]
    pub fn is_animating(&self, id: NodeId) -> bool {
        self.animations.get(&id).is_some_and(|queue| !queue.is_done())
    }

    /// The node's queue, if it is animating.
    #[must_use]
    pub fn animation_queue(&self, id: NodeId) -> Option<&AnimationQueue> {
        self.animations.get(&id)
    }

    /// Nodes with queued animations, in map order.
    pub fn animating_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.animations.keys().copied()
    }

    /// Advances every node's queue by `delta` ms.
    pub fn update_animations(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        let animating: Vec<NodeId> = self.animations.keys().copied().collect();
        for id in animating {
            self.step_queue(id, delta);
        }
    }

    /// Plays the node's whole queue to its end values at once.
    pub fn finish(&mut self, id: NodeId) {
        self.step_queue(id, f32::INFINITY);
        if self.animations.remove(&id).is_some() {
            tracing::trace!(node = %id, "animation finished");
        }
    }

    /// Drops the node's queue, leaving the node at its current values.
    pub fn abort(&mut self, id: NodeId) -> bool {
        let aborted = self.animations.remove(&id).is_some();
        if aborted {
            tracing::trace!(node = %id, "animation aborted");
        }
        aborted
    }

    fn step_queue(&mut self, id: NodeId, delta: f32) {
        let mut remaining = delta;
        while remaining > 0.0 {
            let Some(queue) = self.animations.get_mut(&id) else {
                break;
            };
            let nodes = &self.nodes;
            let Some(step) = queue.step(remaining, || {
                nodes.get(&id).map_or(
                    NodeSample {
                        bounds: Rect::ZERO,
                        color: Color::WHITE,
                        opacity: 1.0,
                        rotation: 0.0,
                    },
                    |node| NodeSample {
                        bounds: node.bounds,
                        color: node.color,
                        opacity: node.opacity,
                        rotation: node.rotation,
                    },
                )
            }) else {
                break;
            };
            remaining -= step.consumed;
            for effect in step.effects {
                self.apply_effect(id, effect);
            }
        }

        if self.animations.get(&id).is_some_and(AnimationQueue::is_done) {
            self.animations.remove(&id);
        }
    }

    fn apply_effect(&mut self, id: NodeId, effect: Effect) {
        match effect {
            Effect::Color(color) => self.set_color(id, color),
            Effect::Opacity(opacity) => self.set_opacity(id, opacity),
            Effect::Rotation(degrees) => self.set_rotation(id, degrees),
            Effect::Bounds { x, y, width, height } => {
                let b = self.bounds(id);
                self.set_bounds(
                    id,
                    Rect::new(
                        x.unwrap_or(b.x),
                        y.unwrap_or(b.y),
                        width.unwrap_or(b.width),
                        height.unwrap_or(b.height),
                    ),
                );
            }
            Effect::Visible(visible) => {
                self.set_visible(id, visible);
            }
            Effect::Skin(skin) => self.set_skin(id, Some(skin)),
            Effect::Action(action) => self.call_action(id, &action),
        }
    }
}
