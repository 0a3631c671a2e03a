//! Geometry primitives and the layout callback seam.
//!
//! Concrete placement math (grids, flows, anchors) lives outside this crate.
//! A node carries an optional [`Layout`] which the scene invokes once per
//! child whenever the node's size changes, plus an opaque [`LayoutAttr`] per
//! child that the layout may read.

use crate::scene::Scene;
use crate::widget::NodeId;

/// A point in scene or canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Bounds given to freshly created nodes.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns this rectangle moved by the origin of `origin`.
    #[must_use]
    pub fn offset_by(&self, origin: &Self) -> Self {
        Self::new(self.x + origin.x, self.y + origin.y, self.width, self.height)
    }

    /// Returns the smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Half the diagonal length, used as the bounding radius of a rotated rect.
    #[must_use]
    pub fn half_diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt() * 0.5
    }
}

/// Opaque per-child data read by a parent's layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutAttr {
    /// An integer slot (card index, flow order).
    Int(i64),
    /// A scalar weight.
    Float(f32),
    /// A named anchor or region.
    Text(String),
    /// A grid cell.
    Cell {
        /// Column index.
        column: u32,
        /// Row index.
        row: u32,
    },
}

/// Positions a node's children whenever the node is resized.
///
/// The scene calls [`Layout::resize_child`] once per child, in sibling
/// order. Implementations may move and resize `child` freely but must not
/// resize `parent`; such attempts are rejected and reported through
/// [`Scene::take_errors`].
pub trait Layout: Send + Sync {
    /// Places `child`, the `index`-th of `total` children of `parent`.
    fn resize_child(
        &self,
        scene: &mut Scene,
        parent: NodeId,
        child: NodeId,
        index: usize,
        total: usize,
    );
}

impl<F> Layout for F
where
    F: Fn(&mut Scene, NodeId, NodeId, usize, usize) + Send + Sync,
{
    fn resize_child(
        &self,
        scene: &mut Scene,
        parent: NodeId,
        child: NodeId,
        index: usize,
        total: usize,
    ) {
        self(scene, parent, child, index, total);
    }
}
