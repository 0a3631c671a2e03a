//! Node model: identifiers, flags, widget capabilities and the scene
//! operations that maintain the tree, its geometry and inherited appearance.

mod appearance;
mod capability;
mod core;
mod geometry;
mod tree;

pub use capability::{Capability, TextHolder, Toggleable, ValueHolder, VisualId, Widget, WidgetValue};
pub use core::{Node, NodeFlags, NodeId};
pub use tree::DepthFirst;
