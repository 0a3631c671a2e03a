//! Events delivered to node listeners and broadcast bindings.
//!
//! A fresh [`Event`] is built for every dispatch and handed to callbacks by
//! reference. Listener code must not stash it; copy out the fields it needs.

use std::fmt;
use std::sync::Arc;

use crate::input::{GamepadAxis, KeyCode, MouseButton};
use crate::layout::Point;
use crate::scene::Scene;
use crate::widget::NodeId;

/// A callback bound to a node event, a broadcast keystroke or an animation.
///
/// Callbacks receive the scene mutably and may restructure the tree, move
/// focus or enqueue animations. Panics are not caught and unwind through
/// the routing entry point that triggered them.
pub type Action = Arc<dyn Fn(&mut Scene, &Event) + Send + Sync>;

/// Wraps a closure as an [`Action`].
pub fn action<F>(f: F) -> Action
where
    F: Fn(&mut Scene, &Event) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOrigin {
    /// Direct call of an action on a node.
    Action,
    /// Device input routed by the scene.
    Input,
    /// State change inside the scene (focus, visibility, values).
    Gui,
}

/// Event type tag, the key for node listener registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Untyped; used by direct action calls.
    Unknown,
    /// Pointer entered the node.
    MouseOver,
    /// Pointer left the node.
    MouseLeave,
    /// Pointer button pressed over the node.
    MousePress,
    /// Pointer button released over the node.
    MouseRelease,
    /// Pointer moved over the node.
    MouseMove,
    /// Pointer moved while the node is held.
    MouseDrag,
    /// Press and release on the same node without dragging.
    MouseClick,
    /// Wheel turned while the node has focus.
    MouseWheel,
    /// Key pressed.
    KeyPress,
    /// Key released.
    KeyRelease,
    /// Character typed.
    KeyType,
    /// Gamepad button pressed.
    GamepadPress,
    /// Gamepad button released.
    GamepadRelease,
    /// Gamepad axis value changed.
    GamepadAxis,
    /// Gamepad axis pushed past its tap threshold.
    GamepadTap,
    /// Node gained focus.
    Focus,
    /// Node lost focus.
    Blur,
    /// Local enabled flag changed.
    ChangeEnableState,
    /// Local visible flag changed.
    ChangeVisibleState,
    /// A widget value (toggle state, field value) changed.
    ValueChange,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pointer coordinates attached to mouse events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseData {
    /// Button involved, for press/release/click/drag.
    pub button: Option<MouseButton>,
    /// Position in device (canvas) units.
    pub canvas: Point,
    /// Position relative to the held or hovered node, `(-1, -1)` if neither.
    pub object: Point,
    /// Position in scene units.
    pub scene: Point,
    /// Movement since the last sample, in scene units.
    pub movement: Point,
}

/// Device-specific event data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    /// No device data.
    None,
    /// Keyboard key.
    Key {
        /// Key code.
        code: KeyCode,
        /// Character, for typed keys.
        character: Option<char>,
    },
    /// Pointer event.
    Mouse(MouseData),
    /// Wheel movement in notches.
    Wheel {
        /// Signed notch count.
        units: i32,
    },
    /// Gamepad button.
    GamepadButton {
        /// Pad index.
        pad: u32,
        /// Button index.
        button: u32,
    },
    /// Gamepad axis value.
    GamepadAxis {
        /// Pad index.
        pad: u32,
        /// Axis.
        axis: GamepadAxis,
        /// New value.
        value: f32,
    },
    /// Gamepad axis tap.
    GamepadTap {
        /// Pad index.
        pad: u32,
        /// Axis.
        axis: GamepadAxis,
        /// Tap direction.
        positive: bool,
    },
}

/// A single dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Source of the event.
    pub origin: EventOrigin,
    /// Type tag.
    pub kind: EventType,
    /// Node the event is delivered to; `None` for broadcasts.
    pub target: Option<NodeId>,
    /// Modifier mask held when the event was built.
    pub modifiers: u32,
    /// Device data.
    pub payload: Payload,
}

impl Event {
    /// Creates an event with no device payload.
    #[must_use]
    pub fn new(origin: EventOrigin, kind: EventType, target: Option<NodeId>) -> Self {
        Self {
            origin,
            kind,
            target,
            modifiers: 0,
            payload: Payload::None,
        }
    }

    /// Builder: sets the modifier mask.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: u32) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Builder: sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// True for keyboard events.
    #[must_use]
    pub fn is_keyboard(&self) -> bool {
        matches!(self.payload, Payload::Key { .. })
    }

    /// True for pointer events other than the wheel.
    #[must_use]
    pub fn is_mouse(&self) -> bool {
        matches!(self.payload, Payload::Mouse(_))
    }

    /// True for wheel events.
    #[must_use]
    pub fn is_mouse_wheel(&self) -> bool {
        matches!(self.payload, Payload::Wheel { .. })
    }

    /// True for gamepad button events.
    #[must_use]
    pub fn is_gamepad(&self) -> bool {
        matches!(self.payload, Payload::GamepadButton { .. })
    }

    /// True for gamepad axis-change events.
    #[must_use]
    pub fn is_gamepad_axis(&self) -> bool {
        matches!(self.payload, Payload::GamepadAxis { .. })
    }

    /// True for gamepad axis-tap events.
    #[must_use]
    pub fn is_gamepad_tap(&self) -> bool {
        matches!(self.payload, Payload::GamepadTap { .. })
    }

    /// Key code, for keyboard events.
    #[must_use]
    pub fn key_code(&self) -> Option<KeyCode> {
        match self.payload {
            Payload::Key { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Pointer data, for mouse events.
    #[must_use]
    pub fn mouse(&self) -> Option<&MouseData> {
        match &self.payload {
            Payload::Mouse(data) => Some(data),
            _ => None,
        }
    }
}
