//! # TRELLIS UI
//!
//! Retained-mode 2D scene graph for tools and game menus:
//! - Node tree with inherited color, opacity, visibility and enabled state
//! - Per-node animation queues stepped by the frame delta
//! - Pointer, keyboard and gamepad routing with a focus state machine
//! - Ordered node sets with set algebra for bulk edits
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SCENE TICK                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Device Input → Router → Listeners → Animation → Paint Pass  │
//! │       ↓           ↓          ↓           ↓           ↓       │
//! │   Viewport    Hit Test    Actions     Queues     PaintItems  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//!
//! A [`Scene`] is a plain value. Listeners receive it as `&mut Scene`, so
//! they can restructure the tree mid-dispatch. To share it across threads,
//! wrap it with [`Scene::into_shared`] and lock it per phase.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actions;
pub mod animation;
pub mod config;
pub mod error;
pub mod event;
pub mod group;
pub mod input;
pub mod layout;
pub mod paint;
pub mod query;
pub mod scene;
pub mod style;
pub mod widget;

pub use actions::ValidInput;
pub use animation::{Animation, AnimationGroup, AnimationQueue, Easing};
pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use event::{action, Action, Event, EventOrigin, EventType, MouseData, Payload};
pub use group::{Direction, FocusOrderGroup, ToggleGroup};
pub use input::{GamepadAxis, InputKind, KeyCode, KeyStroke, Modifiers, MouseButton, Pov};
pub use layout::{Layout, LayoutAttr, Point, Rect};
pub use paint::{CanvasViewport, PaintItem, Viewport};
pub use query::Query;
pub use scene::{Scene, SharedScene};
pub use style::{Color, FontId, ScaleMode, SkinId, Theme};
pub use widget::{Capability, Node, NodeFlags, NodeId, TextHolder, Toggleable, ValueHolder, Widget, WidgetValue};
