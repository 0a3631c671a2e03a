//! Input handling: device codes, keystroke descriptors, listener bindings
//! and the router that turns device input into node events.

mod keys;
mod keystroke;
mod listener;
mod router;

pub use keys::{GamepadAxis, KeyCode, Modifiers, MouseButton, Pov};
pub use keystroke::{InputKind, KeyStroke};
pub(crate) use router::RouterState;
