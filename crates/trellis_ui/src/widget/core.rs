//! Core node types.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use super::capability::Widget;
use crate::event::{Action, EventType};
use crate::layout::{Layout, LayoutAttr, Rect};
use crate::style::{Color, ScaleMode, SkinId, Theme};

/// Unique identifier for a node within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates a new node ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags(u32);

impl NodeFlags {
    /// Locally visible.
    pub const VISIBLE: u32 = 1 << 0;
    /// Locally enabled.
    pub const ENABLED: u32 = 1 << 1;
    /// Ignored by hit testing and unable to hold focus. Not inherited.
    pub const INERT: u32 = 1 << 2;
    /// Children do not inherit this node's color.
    pub const COLOR_NOT_INHERITED: u32 = 1 << 3;
    /// Local bounds are clamped inside the parent's rectangle.
    pub const CONSTRAIN_TO_PARENT: u32 = 1 << 4;
    /// Node belongs to the live scene tree.
    pub const ATTACHED: u32 = 1 << 5;

    /// Default flags for a new node.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::ENABLED);

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag, returning true if it changed.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) -> bool {
        let before = self.has(flag);
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
        before != on
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A positioned, styled element of the scene tree.
///
/// Nodes live in the scene's node store and are addressed by [`NodeId`].
/// Local values are readable here; inherited (effective) values and every
/// mutation go through [`Scene`](crate::Scene) so that bounds propagation,
/// layout and focus stay consistent.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) bounds: Rect,
    pub(crate) absolute: Rect,
    pub(crate) rotation: f32,
    pub(crate) color: Color,
    pub(crate) opacity: f32,
    pub(crate) flags: NodeFlags,
    pub(crate) scale_mode: ScaleMode,
    pub(crate) layout: Option<Arc<dyn Layout>>,
    pub(crate) layout_attr: Option<LayoutAttr>,
    pub(crate) theme: Option<Arc<Theme>>,
    pub(crate) skin: Option<SkinId>,
    pub(crate) names: BTreeSet<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) paint_order: i32,
    pub(crate) listeners: HashMap<EventType, Vec<Action>>,
    pub(crate) widget: Option<Box<dyn Widget>>,
}

impl Node {
    pub(crate) fn new(id: NodeId, widget: Option<Box<dyn Widget>>) -> Self {
        Self {
            id,
            bounds: Rect::UNIT,
            absolute: Rect::UNIT,
            rotation: 0.0,
            color: Color::WHITE,
            opacity: 1.0,
            flags: NodeFlags::DEFAULT,
            scale_mode: ScaleMode::Normal,
            layout: None,
            layout_attr: None,
            theme: None,
            skin: None,
            names: BTreeSet::new(),
            parent: None,
            children: Vec::new(),
            paint_order: -1,
            listeners: HashMap::new(),
            widget,
        }
    }

    /// Node identifier.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Local bounds, relative to the parent.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Cached absolute bounds.
    #[must_use]
    pub fn absolute_bounds(&self) -> Rect {
        self.absolute
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Local color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Local opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Raw flags.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Skin scaling mode.
    #[must_use]
    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Layout attribute read by the parent's layout.
    #[must_use]
    pub fn layout_attr(&self) -> Option<&LayoutAttr> {
        self.layout_attr.as_ref()
    }

    /// Local theme override.
    #[must_use]
    pub fn theme(&self) -> Option<&Arc<Theme>> {
        self.theme.as_ref()
    }

    /// Names (tags) used for selection.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns true if the node carries `name`.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Parent node.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in sibling (paint) order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Paint order assigned by the last paint pass, -1 if not painted.
    #[must_use]
    pub fn paint_order(&self) -> i32 {
        self.paint_order
    }

    /// Returns true if the node is part of the live scene tree.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.flags.has(NodeFlags::ATTACHED)
    }

    /// Widget behavior attached to this node.
    #[must_use]
    pub fn widget(&self) -> Option<&dyn Widget> {
        self.widget.as_deref()
    }

    /// Returns true if at least one listener is bound for `kind`.
    #[must_use]
    pub fn has_listener(&self, kind: EventType) -> bool {
        self.listeners.get(&kind).is_some_and(|l| !l.is_empty())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("flags", &self.flags)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("paint_order", &self.paint_order)
            .finish_non_exhaustive()
    }
}

/// Writes the one-line debug description used by scene dumps.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.widget.as_ref().map_or("node", |w| w.theme_key());
        write!(f, "{kind} {}", self.id)?;
        if self.names.is_empty() {
            f.write_str(" (UNNAMED)")?;
        } else {
            let names: Vec<&str> = self.names().collect();
            write!(f, " [{}]", names.join(", "))?;
        }
        let b = self.bounds;
        write!(f, " R[{:.3}, {:.3}, {:.3}, {:.3}]", b.x, b.y, b.width, b.height)?;
        let c = self.color;
        write!(
            f,
            " RGBA({:.3}, {:.3}, {:.3}, {:.3}) O: {:.3}",
            c.r, c.g, c.b, c.a, self.opacity
        )?;
        if !self.flags.has(NodeFlags::ENABLED) {
            f.write_str(" DISABLED")?;
        }
        if !self.flags.has(NodeFlags::VISIBLE) {
            f.write_str(" INVISIBLE")?;
        }
        if self.flags.has(NodeFlags::INERT) {
            f.write_str(" INERT")?;
        }
        if let Some(attr) = &self.layout_attr {
            write!(f, " {attr:?}")?;
        }
        Ok(())
    }
}
