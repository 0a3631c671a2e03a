//! Device input routing and the focus state machine.
//!
//! ## Pointer
//!
//! ```text
//! move     hover := topmost live node under pointer (LEAVE old, OVER new)
//!          pressed? drag := pressed has a DRAG listener; DRAG to pressed if so
//!          else MOVE to hovered when hover did not change
//! press    hovered? pressed := hovered, PRESS        else pressed := none
//! release  pressed? RELEASE to hovered, CLICK to pressed if still hovered
//!          and not dragged; then pressed := none
//! exit     LEAVE to hovered, hovered := none
//! wheel    focused node only
//! ```
//!
//! ## Keys and gamepad buttons
//!
//! The modifier mask is updated first, then the exact keystroke is
//! broadcast, then the event goes to the focused node. A key counts as
//! handled if a broadcast binding matched or a node had focus. Typed
//! characters and axis values go to the focused node only.
//!
//! Every entry point reports "unhandled" and changes nothing while the scene
//! does not accept input.

use crate::event::{Event, EventOrigin, EventType, MouseData, Payload};
use crate::layout::Point;
use crate::scene::Scene;
use crate::widget::NodeId;

use super::{GamepadAxis, KeyCode, KeyStroke, MouseButton};

/// Last pointer sample, in canvas and scene units.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PointerSample {
    pub canvas: Point,
    pub scene: Point,
    pub movement: Point,
}

/// Hover, press, drag and focus state owned by the scene.
#[derive(Debug)]
pub(crate) struct RouterState {
    pub hovered: Option<NodeId>,
    pub pressed: Option<NodeId>,
    pub pressed_button: Option<MouseButton>,
    pub dragging: bool,
    pub focused: Option<NodeId>,
    pub modifiers: u32,
    pub accepts_input: bool,
    pub pointer: PointerSample,
    pub pointer_inside: bool,
}

impl RouterState {
    pub fn new(accepts_input: bool) -> Self {
        Self {
            hovered: None,
            pressed: None,
            pressed_button: None,
            dragging: false,
            focused: None,
            modifiers: 0,
            accepts_input,
            pointer: PointerSample::default(),
            pointer_inside: false,
        }
    }

    /// Drops hover and press state held by detached nodes.
    pub fn forget(&mut self, detached: &[NodeId]) {
        if self.hovered.is_some_and(|h| detached.contains(&h)) {
            self.hovered = None;
        }
        if self.pressed.is_some_and(|p| detached.contains(&p)) {
            self.pressed = None;
            self.pressed_button = None;
            self.dragging = false;
        }
    }
}

impl Scene {
    /// Whether routing entry points act on input.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.router.accepts_input
    }

    /// Turns input routing on or off.
    pub fn set_accepts_input(&mut self, accepts: bool) {
        self.router.accepts_input = accepts;
    }

    /// Node under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.router.hovered
    }

    /// Node the pointer was pressed on.
    #[must_use]
    pub fn pressed(&self) -> Option<NodeId> {
        self.router.pressed
    }

    /// True while the pressed node is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.router.dragging
    }

    /// Node holding focus.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.router.focused
    }

    /// True if `id` holds focus.
    #[must_use]
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.router.focused == Some(id)
    }

    /// Modifier mask currently held.
    #[must_use]
    pub fn modifiers(&self) -> u32 {
        self.router.modifiers
    }

    /// True if the node may keep focus: attached, effectively visible and
    /// enabled, and not inert.
    #[must_use]
    pub fn can_hold_focus(&self, id: NodeId) -> bool {
        self.is_attached(id) && !self.is_inert(id) && self.effective_visible(id) && self.effective_enabled(id)
    }

    /// Moves focus to `target`, or clears it for `None`.
    ///
    /// Fires BLUR on the node losing focus, then FOCUS on the node gaining
    /// it. Does nothing if `target` already has focus or is not attached.
    /// A hidden or disabled target still takes focus; it is only released
    /// when a later change on it or an ancestor leaves it unusable.
    /// Returns true if `target` ends up focused.
    pub fn request_focus(&mut self, target: Option<NodeId>) -> bool {
        if target.is_some_and(|t| !self.is_attached(t)) || self.router.focused == target {
            return false;
        }

        if let Some(old) = self.router.focused.take() {
            tracing::debug!(node = %old, "focus lost");
            self.fire_event(old, EventType::Blur);
            if self.router.focused.is_some() {
                // A BLUR listener moved focus itself.
                return self.router.focused == target;
            }
        }

        self.router.focused = target;
        if let Some(new) = target {
            tracing::debug!(node = %new, "focus gained");
            self.fire_event(new, EventType::Focus);
        }
        true
    }

    /// Clears focus if `id` holds it.
    pub fn request_unfocus(&mut self, id: NodeId) -> bool {
        self.is_focused(id) && self.request_focus(None)
    }

    /// Releases focus when a change on `changed` left the focused node (or
    /// one of its descendants) unable to hold it.
    pub(crate) fn release_focus_if_unusable(&mut self, changed: NodeId) {
        if let Some(focused) = self.router.focused {
            if self.is_ancestor(changed, focused) && !self.can_hold_focus(focused) {
                self.request_focus(None);
            }
        }
    }

    /// Topmost live node containing a scene-space point.
    ///
    /// Uses the paint order of the last paint pass. Rotation is ignored.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.is_attached() && node.paint_order >= 0)
            .filter(|node| node.absolute.contains(point.x, point.y))
            .filter(|node| self.is_live(node.id))
            .max_by_key(|node| node.paint_order)
            .map(|node| node.id)
    }

    /// Re-runs the hit test at the last pointer position. Returns true if the
    /// hovered node changed.
    pub(crate) fn refresh_hover(&mut self) -> bool {
        let hit = self.node_at(self.router.pointer.scene);
        if hit == self.router.hovered {
            return false;
        }
        if let Some(old) = self.router.hovered {
            let event = self.mouse_event(EventType::MouseLeave, old, None);
            self.dispatch(old, &event);
        }
        self.router.hovered = hit;
        if let Some(new) = hit {
            let event = self.mouse_event(EventType::MouseOver, new, None);
            self.dispatch(new, &event);
        }
        true
    }

    fn mouse_event(&self, kind: EventType, target: NodeId, button: Option<MouseButton>) -> Event {
        let sample = self.router.pointer;
        let object = self
            .router
            .pressed
            .or(self.router.hovered)
            .and_then(|n| self.nodes.get(&n))
            .map_or(Point::new(-1.0, -1.0), |node| {
                Point::new(sample.scene.x - node.absolute.x, sample.scene.y - node.absolute.y)
            });
        Event::new(EventOrigin::Input, kind, Some(target))
            .with_modifiers(self.router.modifiers)
            .with_payload(Payload::Mouse(MouseData {
                button,
                canvas: sample.canvas,
                object,
                scene: sample.scene,
                movement: sample.movement,
            }))
    }

    fn input_event(&self, kind: EventType, target: Option<NodeId>, payload: Payload) -> Event {
        Event::new(EventOrigin::Input, kind, target)
            .with_modifiers(self.router.modifiers)
            .with_payload(payload)
    }

    /// Pointer moved to `canvas` (device units) by `movement`.
    pub fn pointer_move(&mut self, canvas: Point, movement: Point) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        self.router.pointer = PointerSample {
            canvas,
            scene: self.viewport.to_scene(canvas),
            movement: self.viewport.scale_movement(movement),
        };
        self.router.pointer_inside = true;
        let hover_changed = self.refresh_hover();

        if let Some(pressed) = self.router.pressed {
            let dragging = self.has_listener(pressed, EventType::MouseDrag);
            self.router.dragging = dragging;
            if dragging {
                let event = self.mouse_event(EventType::MouseDrag, pressed, self.router.pressed_button);
                self.dispatch(pressed, &event);
            }
            return true;
        }
        match self.router.hovered {
            Some(hovered) => {
                if !hover_changed {
                    let event = self.mouse_event(EventType::MouseMove, hovered, None);
                    self.dispatch(hovered, &event);
                }
                true
            }
            None => false,
        }
    }

    /// Pointer button pressed.
    pub fn pointer_press(&mut self, button: MouseButton) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        self.router.dragging = false;
        let Some(hovered) = self.router.hovered else {
            self.router.pressed = None;
            self.router.pressed_button = None;
            return false;
        };
        self.router.pressed = Some(hovered);
        self.router.pressed_button = Some(button);
        let event = self.mouse_event(EventType::MousePress, hovered, Some(button));
        self.dispatch(hovered, &event);
        true
    }

    /// Pointer button released.
    pub fn pointer_release(&mut self, button: MouseButton) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        let pressed = self.router.pressed;
        if let Some(pressed) = pressed {
            let hovered = self.router.hovered;
            let dragged = self.router.dragging;
            if let Some(hovered) = hovered {
                let event = self.mouse_event(EventType::MouseRelease, hovered, Some(button));
                self.dispatch(hovered, &event);
            }
            if hovered == Some(pressed) && !dragged {
                let event = self.mouse_event(EventType::MouseClick, pressed, Some(button));
                self.dispatch(pressed, &event);
            }
        }
        self.router.pressed = None;
        self.router.pressed_button = None;
        self.router.dragging = false;
        pressed.is_some()
    }

    /// Wheel turned by `units` notches. Goes to the focused node.
    pub fn pointer_wheel(&mut self, units: i32) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        let Some(focused) = self.router.focused else {
            return false;
        };
        let event = self.input_event(EventType::MouseWheel, Some(focused), Payload::Wheel { units });
        self.dispatch(focused, &event);
        true
    }

    /// Pointer left the canvas.
    pub fn pointer_exit(&mut self) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        if let Some(hovered) = self.router.hovered {
            let event = self.mouse_event(EventType::MouseLeave, hovered, None);
            self.dispatch(hovered, &event);
        }
        self.router.hovered = None;
        self.router.pointer_inside = false;
        true
    }

    /// Key pressed.
    pub fn key_press(&mut self, code: KeyCode) -> bool {
        self.route_key(code, false)
    }

    /// Key released.
    pub fn key_release(&mut self, code: KeyCode) -> bool {
        self.route_key(code, true)
    }

    fn route_key(&mut self, code: KeyCode, release: bool) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        if let Some(mask) = code.modifier_mask() {
            if release {
                self.router.modifiers &= !mask;
            } else {
                self.router.modifiers |= mask;
            }
        }
        let kind = if release { EventType::KeyRelease } else { EventType::KeyPress };
        let stroke = KeyStroke::key(self.router.modifiers, code, release);
        self.route_stroke(stroke, kind, Payload::Key { code, character: None })
    }

    /// Character typed. Goes to the focused node only.
    pub fn key_typed(&mut self, code: KeyCode, character: Option<char>) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        self.route_focused(EventType::KeyType, Payload::Key { code, character })
    }

    /// Gamepad button pressed.
    pub fn gamepad_press(&mut self, pad: u32, button: u32) -> bool {
        self.route_gamepad_button(pad, button, false)
    }

    /// Gamepad button released.
    pub fn gamepad_release(&mut self, pad: u32, button: u32) -> bool {
        self.route_gamepad_button(pad, button, true)
    }

    fn route_gamepad_button(&mut self, pad: u32, button: u32, release: bool) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        let kind = if release {
            EventType::GamepadRelease
        } else {
            EventType::GamepadPress
        };
        let stroke = KeyStroke::gamepad(self.router.modifiers, button, release);
        self.route_stroke(stroke, kind, Payload::GamepadButton { pad, button })
    }

    /// Gamepad axis pushed past its tap threshold.
    pub fn gamepad_tap(&mut self, pad: u32, axis: GamepadAxis, positive: bool) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        let stroke = KeyStroke::gamepad_tap(axis, positive);
        self.route_stroke(stroke, EventType::GamepadTap, Payload::GamepadTap { pad, axis, positive })
    }

    /// Gamepad axis value changed. Goes to the focused node only.
    pub fn gamepad_axis(&mut self, pad: u32, axis: GamepadAxis, value: f32) -> bool {
        if !self.router.accepts_input {
            return false;
        }
        self.route_focused(EventType::GamepadAxis, Payload::GamepadAxis { pad, axis, value })
    }

    fn route_stroke(&mut self, stroke: KeyStroke, kind: EventType, payload: Payload) -> bool {
        let event = self.input_event(kind, None, payload);
        let broadcast = self.dispatch_broadcast(stroke, &event);
        let focused = self.route_focused(kind, payload);
        broadcast || focused
    }

    fn route_focused(&mut self, kind: EventType, payload: Payload) -> bool {
        let Some(focused) = self.router.focused else {
            return false;
        };
        let event = self.input_event(kind, Some(focused), payload);
        self.dispatch(focused, &event);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::event::{action, EventType};
    use crate::input::{KeyCode, KeyStroke, Modifiers, MouseButton};
    use crate::layout::{Point, Rect};
    use crate::paint::CanvasViewport;
    use crate::scene::Scene;
    use crate::widget::NodeId;

    type Log = Arc<Mutex<Vec<(NodeId, EventType)>>>;

    fn record(scene: &mut Scene, node: NodeId, log: &Log, kinds: &[EventType]) {
        let log = Arc::clone(log);
        scene.bind(
            node,
            action(move |_, event| {
                if let Some(target) = event.target {
                    log.lock().push((target, event.kind));
                }
            }),
            kinds,
        );
    }

    fn two_buttons() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new(CanvasViewport::new(200.0, 200.0));
        let a = scene.create_node();
        let b = scene.create_node();
        scene.add_root(a);
        scene.add_root(b);
        scene.set_bounds(a, Rect::new(0.0, 0.0, 50.0, 50.0));
        scene.set_bounds(b, Rect::new(100.0, 0.0, 50.0, 50.0));
        scene.assign_paint_order();
        (scene, a, b)
    }

    const POINTER: [EventType; 7] = [
        EventType::MouseOver,
        EventType::MouseLeave,
        EventType::MouseMove,
        EventType::MousePress,
        EventType::MouseRelease,
        EventType::MouseClick,
        EventType::MouseDrag,
    ];

    #[test]
    fn test_hover_press_click() {
        let (mut scene, a, b) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &POINTER);
        record(&mut scene, b, &log, &POINTER);

        assert!(scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO));
        assert!(scene.pointer_move(Point::new(11.0, 10.0), Point::new(1.0, 0.0)));
        assert!(scene.pointer_press(MouseButton::Left));
        assert!(scene.pointer_release(MouseButton::Left));
        assert!(scene.pointer_move(Point::new(110.0, 10.0), Point::new(99.0, 0.0)));

        assert_eq!(
            *log.lock(),
            vec![
                (a, EventType::MouseOver),
                (a, EventType::MouseMove),
                (a, EventType::MousePress),
                (a, EventType::MouseRelease),
                (a, EventType::MouseClick),
                (a, EventType::MouseLeave),
                (b, EventType::MouseOver),
            ]
        );
    }

    #[test]
    fn test_release_elsewhere_is_not_a_click() {
        let (mut scene, a, b) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &[EventType::MouseClick, EventType::MouseRelease]);
        record(&mut scene, b, &log, &[EventType::MouseClick, EventType::MouseRelease]);

        scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO);
        scene.pointer_press(MouseButton::Left);
        scene.pointer_move(Point::new(110.0, 10.0), Point::ZERO);
        assert!(scene.pointer_release(MouseButton::Left));
        assert_eq!(*log.lock(), vec![(b, EventType::MouseRelease)]);
        assert_eq!(scene.pressed(), None);
    }

    #[test]
    fn test_drag_suppresses_click() {
        let (mut scene, a, _) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &[EventType::MouseDrag, EventType::MouseClick]);

        scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO);
        scene.pointer_press(MouseButton::Left);
        scene.pointer_move(Point::new(12.0, 10.0), Point::new(2.0, 0.0));
        assert!(scene.is_dragging());
        scene.pointer_release(MouseButton::Left);
        assert_eq!(*log.lock(), vec![(a, EventType::MouseDrag)]);
        assert!(!scene.is_dragging());
    }

    #[test]
    fn test_press_on_nothing() {
        let (mut scene, _, _) = two_buttons();
        scene.pointer_move(Point::new(75.0, 10.0), Point::ZERO);
        assert!(!scene.pointer_press(MouseButton::Left));
        assert!(!scene.pointer_release(MouseButton::Left));
    }

    #[test]
    fn test_topmost_wins() {
        let (mut scene, a, _) = two_buttons();
        let over = scene.create_node();
        scene.add_root(over);
        scene.set_bounds(over, Rect::new(0.0, 0.0, 20.0, 20.0));
        scene.assign_paint_order();
        assert_eq!(scene.node_at(Point::new(5.0, 5.0)), Some(over));
        assert_eq!(scene.node_at(Point::new(30.0, 30.0)), Some(a));

        scene.set_inert(over, true);
        assert_eq!(scene.node_at(Point::new(5.0, 5.0)), Some(a));
    }

    #[test]
    fn test_pointer_exit_leaves() {
        let (mut scene, a, _) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &[EventType::MouseLeave]);
        scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO);
        assert!(scene.pointer_exit());
        assert_eq!(scene.hovered(), None);
        assert_eq!(*log.lock(), vec![(a, EventType::MouseLeave)]);
    }

    #[test]
    fn test_focus_transitions() {
        let (mut scene, a, b) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &[EventType::Focus, EventType::Blur]);
        record(&mut scene, b, &log, &[EventType::Focus, EventType::Blur]);

        assert!(scene.request_focus(Some(a)));
        assert!(!scene.request_focus(Some(a)));
        assert!(scene.request_focus(Some(b)));
        assert!(!scene.request_unfocus(a));
        assert!(scene.request_unfocus(b));
        assert!(!scene.request_focus(None));
        assert_eq!(
            *log.lock(),
            vec![
                (a, EventType::Focus),
                (a, EventType::Blur),
                (b, EventType::Focus),
                (b, EventType::Blur),
            ]
        );
    }

    #[test]
    fn test_focus_moves_to_disabled_node() {
        let (mut scene, a, b) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &[EventType::Focus, EventType::Blur]);
        record(&mut scene, b, &log, &[EventType::Focus, EventType::Blur]);
        scene.request_focus(Some(a));
        scene.set_enabled(b, false);

        assert!(scene.request_focus(Some(b)));
        assert_eq!(scene.focused(), Some(b));
        assert_eq!(
            *log.lock(),
            vec![(a, EventType::Focus), (a, EventType::Blur), (b, EventType::Focus)]
        );

        // Unrelated changes leave it alone; a change on b itself releases it.
        scene.set_visible(a, false);
        assert_eq!(scene.focused(), Some(b));
        scene.set_inert(b, true);
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn test_detached_targets_are_refused() {
        let (mut scene, a, _) = two_buttons();
        scene.request_focus(Some(a));
        let loose = scene.create_node();
        assert!(!scene.request_focus(Some(loose)));
        assert_eq!(scene.focused(), Some(a));
    }

    #[test]
    fn test_hiding_parent_releases_focus() {
        let (mut scene, a, _) = two_buttons();
        let child = scene.create_node();
        scene.add_child(a, child);
        scene.request_focus(Some(child));
        scene.set_visible(a, false);
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn test_modifier_mask_tracks_keys() {
        let (mut scene, _, _) = two_buttons();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        scene.bind_broadcast(
            KeyStroke::key(Modifiers::CTRL, KeyCode::S, false),
            action(move |_, _| *counter.lock() += 1),
        );

        assert!(!scene.key_press(KeyCode::S));
        scene.key_press(KeyCode::CONTROL);
        assert_eq!(scene.modifiers(), Modifiers::CTRL);
        assert!(scene.key_press(KeyCode::S));
        scene.key_release(KeyCode::CONTROL);
        assert_eq!(scene.modifiers(), 0);
        assert!(!scene.key_press(KeyCode::S));
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_typed_and_wheel_need_focus() {
        let (mut scene, a, _) = two_buttons();
        let log: Log = Arc::default();
        record(&mut scene, a, &log, &[EventType::KeyType, EventType::MouseWheel]);
        assert!(!scene.key_typed(KeyCode::A, Some('a')));
        assert!(!scene.pointer_wheel(1));
        scene.request_focus(Some(a));
        assert!(scene.key_typed(KeyCode::A, Some('a')));
        assert!(scene.pointer_wheel(-2));
        assert_eq!(*log.lock(), vec![(a, EventType::KeyType), (a, EventType::MouseWheel)]);
    }

    #[test]
    fn test_input_gate() {
        let (mut scene, a, _) = two_buttons();
        scene.request_focus(Some(a));
        scene.set_accepts_input(false);
        assert!(!scene.pointer_move(Point::new(10.0, 10.0), Point::ZERO));
        assert_eq!(scene.hovered(), None);
        assert!(!scene.key_press(KeyCode::CONTROL));
        assert_eq!(scene.modifiers(), 0);
        assert!(!scene.pointer_exit());
        assert!(!scene.gamepad_press(0, 1));
    }
}
