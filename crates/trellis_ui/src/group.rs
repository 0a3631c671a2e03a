//! Behaviors spanning several nodes: focus traversal and exclusive toggles.
//!
//! Groups have no storage in the scene. Binding one installs listeners on
//! each member; unbinding those listeners (or destroying the members) is
//! all it takes to dissolve the group.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{action, Event, EventType, Payload};
use crate::input::{GamepadAxis, KeyCode, Pov};
use crate::scene::Scene;
use crate::widget::NodeId;

/// Axis along which a [`FocusOrderGroup`] moves focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left/right keys, POV left/right and X axis taps.
    Horizontal,
    /// Up/down keys, POV up/down and Y axis taps.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

impl Direction {
    fn key_step(self, code: KeyCode) -> Option<Step> {
        match (self, code) {
            (Self::Horizontal, KeyCode::RIGHT) | (Self::Vertical, KeyCode::DOWN) => Some(Step::Forward),
            (Self::Horizontal, KeyCode::LEFT) | (Self::Vertical, KeyCode::UP) => Some(Step::Backward),
            _ => None,
        }
    }

    #[allow(clippy::float_cmp)]
    fn pov_step(self, value: f32) -> Option<Step> {
        match self {
            Self::Horizontal => {
                if (Pov::UP_RIGHT..=Pov::DOWN_RIGHT).contains(&value) {
                    Some(Step::Forward)
                } else if (Pov::DOWN_LEFT..=Pov::LEFT).contains(&value) || value == Pov::UP_LEFT {
                    Some(Step::Backward)
                } else {
                    None
                }
            }
            Self::Vertical => {
                if (Pov::UP_LEFT..=Pov::UP_RIGHT).contains(&value) {
                    Some(Step::Backward)
                } else if (Pov::DOWN_RIGHT..=Pov::DOWN_LEFT).contains(&value) {
                    Some(Step::Forward)
                } else {
                    None
                }
            }
        }
    }

    fn tap_axis(self) -> GamepadAxis {
        match self {
            Self::Horizontal => GamepadAxis::X,
            Self::Vertical => GamepadAxis::Y,
        }
    }

    fn step(self, event: &Event) -> Option<Step> {
        match event.payload {
            Payload::Key { code, .. } => self.key_step(code),
            Payload::GamepadAxis {
                axis: GamepadAxis::Pov,
                value,
                ..
            } => self.pov_step(value),
            Payload::GamepadTap { axis, positive, .. } if axis == self.tap_axis() => {
                Some(if positive { Step::Forward } else { Step::Backward })
            }
            _ => None,
        }
    }
}

/// Moves focus through an ordered list of nodes.
pub struct FocusOrderGroup;

impl FocusOrderGroup {
    /// Events a member listens to.
    pub const EVENTS: [EventType; 3] = [EventType::KeyPress, EventType::GamepadAxis, EventType::GamepadTap];

    /// Binds traversal listeners on every node.
    ///
    /// While a member has focus, the forward input focuses the next member
    /// and the backward input the previous one. With `looped`, the ends wrap
    /// around; otherwise they stay put.
    pub fn bind(scene: &mut Scene, direction: Direction, looped: bool, nodes: &[NodeId]) {
        let count = nodes.len();
        for (i, &node) in nodes.iter().enumerate() {
            let backward = match i {
                0 if looped => nodes.last().copied(),
                0 => None,
                _ => Some(nodes[i - 1]),
            };
            let forward = if i + 1 < count {
                Some(nodes[i + 1])
            } else if looped {
                nodes.first().copied()
            } else {
                None
            };

            let traverse = action(move |scene: &mut Scene, event: &Event| {
                let target = match direction.step(event) {
                    Some(Step::Forward) => forward,
                    Some(Step::Backward) => backward,
                    None => return,
                };
                if let Some(target) = target {
                    scene.request_focus(Some(target));
                }
            });
            scene.bind(node, traverse, &Self::EVENTS);
        }
        tracing::debug!(members = count, ?direction, looped, "focus order group bound");
    }
}

/// Keeps at most one toggleable member set.
///
/// When a member switches on, the previously set member is switched off.
#[derive(Debug, Clone, Default)]
pub struct ToggleGroup {
    current: Arc<Mutex<Option<NodeId>>>,
}

impl ToggleGroup {
    /// Binds a group over `nodes`. Members without the toggle capability are
    /// ignored.
    pub fn bind(scene: &mut Scene, nodes: &[NodeId]) -> Self {
        let group = Self::default();
        let current = Arc::clone(&group.current);
        let on_change = action(move |scene: &mut Scene, event: &Event| {
            let Some(target) = event.target else {
                return;
            };
            if !scene.toggle_state(target) {
                let mut current = current.lock();
                if *current == Some(target) {
                    *current = None;
                }
                return;
            }

            let previous = *current.lock();
            if let Some(previous) = previous.filter(|&p| p != target) {
                scene.set_toggle_state(previous, false);
            }
            *current.lock() = Some(target);
        });
        for &node in nodes {
            scene.bind(node, Arc::clone(&on_change), &[EventType::ValueChange]);
        }
        group
    }

    /// Member currently set, if any.
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::CanvasViewport;
    use crate::widget::{Toggleable, Widget};

    struct Radio {
        on: bool,
    }

    impl Toggleable for Radio {
        fn is_set(&self) -> bool {
            self.on
        }

        fn set_state(&mut self, state: bool) {
            self.on = state;
        }
    }

    impl Widget for Radio {
        fn theme_key(&self) -> &str {
            "radio"
        }

        fn as_toggleable(&self) -> Option<&dyn Toggleable> {
            Some(self)
        }

        fn as_toggleable_mut(&mut self) -> Option<&mut dyn Toggleable> {
            Some(self)
        }
    }

    fn row(count: usize) -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::new(CanvasViewport::new(100.0, 100.0));
        let nodes: Vec<NodeId> = (0..count)
            .map(|_| {
                let node = scene.create_widget(Radio { on: false });
                scene.add_root(node);
                node
            })
            .collect();
        (scene, nodes)
    }

    #[test]
    fn test_horizontal_keys_move_focus() {
        let (mut scene, nodes) = row(3);
        FocusOrderGroup::bind(&mut scene, Direction::Horizontal, false, &nodes);
        scene.request_focus(Some(nodes[0]));

        scene.key_press(KeyCode::RIGHT);
        assert_eq!(scene.focused(), Some(nodes[1]));
        scene.key_press(KeyCode::DOWN);
        assert_eq!(scene.focused(), Some(nodes[1]));
        scene.key_press(KeyCode::RIGHT);
        scene.key_press(KeyCode::RIGHT);
        assert_eq!(scene.focused(), Some(nodes[2]));
        scene.key_press(KeyCode::LEFT);
        assert_eq!(scene.focused(), Some(nodes[1]));
    }

    #[test]
    fn test_looped_order_wraps() {
        let (mut scene, nodes) = row(3);
        FocusOrderGroup::bind(&mut scene, Direction::Vertical, true, &nodes);
        scene.request_focus(Some(nodes[0]));

        scene.key_press(KeyCode::UP);
        assert_eq!(scene.focused(), Some(nodes[2]));
        scene.gamepad_tap(0, GamepadAxis::Y, true);
        assert_eq!(scene.focused(), Some(nodes[0]));
        scene.gamepad_tap(0, GamepadAxis::X, true);
        assert_eq!(scene.focused(), Some(nodes[0]));
    }

    #[test]
    fn test_pov_ranges() {
        assert_eq!(Direction::Horizontal.pov_step(Pov::RIGHT), Some(Step::Forward));
        assert_eq!(Direction::Horizontal.pov_step(Pov::UP_LEFT), Some(Step::Backward));
        assert_eq!(Direction::Horizontal.pov_step(Pov::UP), None);
        assert_eq!(Direction::Vertical.pov_step(Pov::UP), Some(Step::Backward));
        assert_eq!(Direction::Vertical.pov_step(Pov::DOWN), Some(Step::Forward));
        assert_eq!(Direction::Vertical.pov_step(Pov::CENTER), None);

        let (mut scene, nodes) = row(2);
        FocusOrderGroup::bind(&mut scene, Direction::Horizontal, false, &nodes);
        scene.request_focus(Some(nodes[0]));
        scene.gamepad_axis(0, GamepadAxis::Pov, Pov::DOWN_RIGHT);
        assert_eq!(scene.focused(), Some(nodes[1]));
    }

    #[test]
    fn test_toggle_group_is_exclusive() {
        let (mut scene, nodes) = row(3);
        let group = ToggleGroup::bind(&mut scene, &nodes);

        scene.set_toggle_state(nodes[0], true);
        assert_eq!(group.current(), Some(nodes[0]));

        scene.set_toggle_state(nodes[2], true);
        assert!(!scene.toggle_state(nodes[0]));
        assert!(scene.toggle_state(nodes[2]));
        assert_eq!(group.current(), Some(nodes[2]));

        scene.toggle(nodes[2]);
        assert_eq!(group.current(), None);
        assert!(nodes.iter().all(|&n| !scene.toggle_state(n)));
    }
}
