//! Ready-made actions for common listener wiring.
//!
//! Each constructor returns a fresh [`Action`] that operates on the event's
//! target node. Bind them like any other action:
//!
//! ```ignore
//! scene.bind(window, actions::move_to_front(), &[EventType::MousePress]);
//! scene.bind(title_bar, actions::drag_translate(), &[EventType::MouseDrag]);
//! ```
//!
//! [`ValidInput`] gates an action on the device input that triggered it, so
//! one action can sit on both pointer and key events:
//!
//! ```ignore
//! let press = ValidInput::new()
//!     .key(KeyCode::ENTER)
//!     .mouse_button(MouseButton::Left)
//!     .wrap(actions::focus());
//! scene.bind(button, press, &[EventType::KeyPress, EventType::MouseClick]);
//! ```

use std::collections::HashSet;

use crate::event::{action, Action, Event, Payload};
use crate::input::{GamepadAxis, KeyCode, MouseButton};
use crate::scene::Scene;

/// Focuses the target node.
#[must_use]
pub fn focus() -> Action {
    action(|scene: &mut Scene, event: &Event| {
        if let Some(target) = event.target {
            scene.request_focus(Some(target));
        }
    })
}

/// Raises the target node above its siblings.
#[must_use]
pub fn move_to_front() -> Action {
    action(|scene: &mut Scene, event: &Event| {
        if let Some(target) = event.target {
            scene.move_to_front(target);
        }
    })
}

/// Lowers the target node below its siblings.
#[must_use]
pub fn move_to_back() -> Action {
    action(|scene: &mut Scene, event: &Event| {
        if let Some(target) = event.target {
            scene.move_to_back(target);
        }
    })
}

/// Moves the target node with the pointer. Ignores non-pointer events.
#[must_use]
pub fn drag_translate() -> Action {
    action(|scene: &mut Scene, event: &Event| {
        if let (Some(target), Some(mouse)) = (event.target, event.mouse()) {
            scene.translate(target, mouse.movement.x, mouse.movement.y);
        }
    })
}

/// Accepted device inputs for a gated action.
///
/// Keyboard events match on key code, pointer events on button, gamepad
/// buttons on button index and axis taps on axis and direction. Every other
/// event is rejected, as is any input kind with nothing registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidInput {
    keys: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    gamepad_buttons: HashSet<u32>,
    gamepad_taps: HashSet<(GamepadAxis, bool)>,
}

impl ValidInput {
    /// Accepts nothing until inputs are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: accepts a key code.
    #[must_use]
    pub fn key(mut self, code: KeyCode) -> Self {
        self.keys.insert(code);
        self
    }

    /// Builder: accepts a mouse button.
    #[must_use]
    pub fn mouse_button(mut self, button: MouseButton) -> Self {
        self.mouse_buttons.insert(button);
        self
    }

    /// Builder: accepts a gamepad button index.
    #[must_use]
    pub fn gamepad_button(mut self, button: u32) -> Self {
        self.gamepad_buttons.insert(button);
        self
    }

    /// Builder: accepts a tap on `axis` in one direction.
    #[must_use]
    pub fn gamepad_tap(mut self, axis: GamepadAxis, positive: bool) -> Self {
        self.gamepad_taps.insert((axis, positive));
        self
    }

    /// Stops accepting a key code.
    pub fn remove_key(&mut self, code: KeyCode) -> bool {
        self.keys.remove(&code)
    }

    /// Stops accepting a mouse button.
    pub fn remove_mouse_button(&mut self, button: MouseButton) -> bool {
        self.mouse_buttons.remove(&button)
    }

    /// Stops accepting a gamepad button.
    pub fn remove_gamepad_button(&mut self, button: u32) -> bool {
        self.gamepad_buttons.remove(&button)
    }

    /// Stops accepting a gamepad tap.
    pub fn remove_gamepad_tap(&mut self, axis: GamepadAxis, positive: bool) -> bool {
        self.gamepad_taps.remove(&(axis, positive))
    }

    /// True if the event's device input is accepted.
    #[must_use]
    pub fn accepts(&self, event: &Event) -> bool {
        match event.payload {
            Payload::Key { code, .. } => self.keys.contains(&code),
            Payload::Mouse(data) => data.button.is_some_and(|b| self.mouse_buttons.contains(&b)),
            Payload::GamepadButton { button, .. } => self.gamepad_buttons.contains(&button),
            Payload::GamepadTap { axis, positive, .. } => self.gamepad_taps.contains(&(axis, positive)),
            Payload::None | Payload::Wheel { .. } | Payload::GamepadAxis { .. } => false,
        }
    }

    /// Wraps `inner` so it only runs for accepted input.
    #[must_use]
    pub fn wrap(self, inner: Action) -> Action {
        action(move |scene: &mut Scene, event: &Event| {
            if self.accepts(event) {
                inner(scene, event);
            }
        })
    }

    /// Wraps several actions that run in order for accepted input.
    #[must_use]
    pub fn wrap_all(self, actions: Vec<Action>) -> Action {
        action(move |scene: &mut Scene, event: &Event| {
            if self.accepts(event) {
                for inner in &actions {
                    inner(scene, event);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::input::MouseButton;
    use crate::layout::{Point, Rect};
    use crate::paint::CanvasViewport;

    #[test]
    fn test_press_raises_and_drag_moves() {
        let mut scene = Scene::new(CanvasViewport::new(200.0, 200.0));
        let back = scene.create_node();
        let front = scene.create_node();
        scene.add_root(back);
        scene.add_root(front);
        scene.set_bounds(back, Rect::new(0.0, 0.0, 50.0, 50.0));
        scene.bind(back, move_to_front(), &[EventType::MousePress]);
        scene.bind(back, drag_translate(), &[EventType::MouseDrag]);
        scene.bind(back, focus(), &[EventType::MouseClick]);
        scene.assign_paint_order();

        scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO);
        scene.pointer_press(MouseButton::Left);
        assert_eq!(scene.roots(), &[front, back]);

        scene.pointer_move(Point::new(15.0, 12.0), Point::new(5.0, 2.0));
        assert_eq!(scene.bounds(back), Rect::new(5.0, 2.0, 50.0, 50.0));

        scene.pointer_release(MouseButton::Left);
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn test_click_focuses_and_move_to_back() {
        let mut scene = Scene::new(CanvasViewport::new(200.0, 200.0));
        let a = scene.create_node();
        let b = scene.create_node();
        scene.add_root(a);
        scene.add_root(b);
        scene.set_bounds(b, Rect::new(0.0, 0.0, 50.0, 50.0));
        scene.bind(b, focus(), &[EventType::MouseClick]);
        scene.bind(b, move_to_back(), &[EventType::Focus]);
        scene.assign_paint_order();

        scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO);
        scene.pointer_press(MouseButton::Left);
        scene.pointer_release(MouseButton::Left);
        assert_eq!(scene.focused(), Some(b));
        assert_eq!(scene.roots(), &[b, a]);
    }

    fn key_event(code: KeyCode) -> Event {
        Event::new(crate::event::EventOrigin::Input, EventType::KeyPress, None)
            .with_payload(Payload::Key { code, character: None })
    }

    #[test]
    fn test_valid_input_matching() {
        let valid = ValidInput::new()
            .key(KeyCode::ENTER)
            .gamepad_button(0)
            .gamepad_tap(GamepadAxis::X, true);

        assert!(valid.accepts(&key_event(KeyCode::ENTER)));
        assert!(!valid.accepts(&key_event(KeyCode::A)));

        let tap = |positive| {
            Event::new(crate::event::EventOrigin::Input, EventType::GamepadTap, None).with_payload(
                Payload::GamepadTap {
                    pad: 0,
                    axis: GamepadAxis::X,
                    positive,
                },
            )
        };
        assert!(valid.accepts(&tap(true)));
        assert!(!valid.accepts(&tap(false)));

        let wheel = Event::new(crate::event::EventOrigin::Input, EventType::MouseWheel, None)
            .with_payload(Payload::Wheel { units: 1 });
        assert!(!valid.accepts(&wheel));

        let mut valid = valid;
        assert!(valid.remove_key(KeyCode::ENTER));
        assert!(!valid.accepts(&key_event(KeyCode::ENTER)));
    }

    #[test]
    fn test_gated_actions_run_for_accepted_input_only() {
        let mut scene = Scene::new(CanvasViewport::new(200.0, 200.0));
        let back = scene.create_node();
        let button = scene.create_node();
        scene.add_root(button);
        scene.add_root(back);
        scene.set_bounds(button, Rect::new(0.0, 0.0, 50.0, 50.0));
        scene.assign_paint_order();

        let gate = ValidInput::new().key(KeyCode::ENTER).mouse_button(MouseButton::Left);
        let press = gate.wrap_all(vec![focus(), move_to_front()]);
        scene.bind(button, press, &[EventType::KeyPress, EventType::MouseClick]);

        scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO);
        scene.pointer_press(MouseButton::Right);
        scene.pointer_release(MouseButton::Right);
        assert_eq!(scene.focused(), None);
        assert_eq!(scene.roots(), &[button, back]);

        scene.pointer_press(MouseButton::Left);
        scene.pointer_release(MouseButton::Left);
        assert_eq!(scene.focused(), Some(button));
        assert_eq!(scene.roots(), &[back, button]);
    }
}
