//! Animatable node properties.
//!
//! Continuous properties interpolate from the value sampled when their group
//! starts to the target, using `from + t * (to - from)` for every scalar,
//! color channel and rectangle edge. Set-once properties apply on the first
//! step of their group and are not touched again.

use std::fmt;

use crate::event::Action;
use crate::layout::Rect;
use crate::style::{Color, SkinId};

/// One property change within an animation group.
#[derive(Clone)]
pub enum Animation {
    /// Color, per channel.
    Color(Color),
    /// Local opacity.
    Opacity(f32),
    /// Any subset of the local rectangle's edges. `None` edges keep their value.
    Bounds {
        /// Target x.
        x: Option<f32>,
        /// Target y.
        y: Option<f32>,
        /// Target width.
        width: Option<f32>,
        /// Target height.
        height: Option<f32>,
    },
    /// Rotation in degrees.
    Rotation(f32),
    /// Local visibility, set once when the group starts.
    Visible(bool),
    /// Skin frames; the frame shown advances with progress.
    Skin(Vec<SkinId>),
    /// Callback invoked once when the group starts.
    Action(Action),
}

impl Animation {
    /// Animates the color.
    #[must_use]
    pub fn color(color: Color) -> Self {
        Self::Color(color)
    }

    /// Animates the opacity.
    #[must_use]
    pub fn opacity(opacity: f32) -> Self {
        Self::Opacity(opacity)
    }

    /// Animates the position.
    #[must_use]
    pub fn position(x: Option<f32>, y: Option<f32>) -> Self {
        Self::bounds(x, y, None, None)
    }

    /// Animates the size.
    #[must_use]
    pub fn dimensions(width: Option<f32>, height: Option<f32>) -> Self {
        Self::bounds(None, None, width, height)
    }

    /// Animates any subset of the rectangle.
    #[must_use]
    pub fn bounds(x: Option<f32>, y: Option<f32>, width: Option<f32>, height: Option<f32>) -> Self {
        Self::Bounds { x, y, width, height }
    }

    /// Animates the rotation.
    #[must_use]
    pub fn rotation(degrees: f32) -> Self {
        Self::Rotation(degrees)
    }

    /// Shows or hides the node when the group starts.
    #[must_use]
    pub fn visible(visible: bool) -> Self {
        Self::Visible(visible)
    }

    /// Flips through skin frames over the group's duration.
    #[must_use]
    pub fn skin(frames: Vec<SkinId>) -> Self {
        Self::Skin(frames)
    }

    /// Calls `action` when the group starts.
    #[must_use]
    pub fn action(action: Action) -> Self {
        Self::Action(action)
    }

    /// The change to apply at eased progress `t`.
    pub(crate) fn effect(&self, from: &NodeSample, t: f32, first_step: bool) -> Option<Effect> {
        match self {
            Self::Color(to) => Some(Effect::Color(from.color.lerp(*to, t))),
            Self::Opacity(to) => Some(Effect::Opacity(lerp(from.opacity, *to, t))),
            Self::Rotation(to) => Some(Effect::Rotation(lerp(from.rotation, *to, t))),
            Self::Bounds { x, y, width, height } => {
                let b = from.bounds;
                Some(Effect::Bounds {
                    x: x.map(|to| lerp(b.x, to, t)),
                    y: y.map(|to| lerp(b.y, to, t)),
                    width: width.map(|to| lerp(b.width, to, t)),
                    height: height.map(|to| lerp(b.height, to, t)),
                })
            }
            Self::Skin(frames) => {
                let last = frames.len().checked_sub(1)?;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
                let index = ((t * frames.len() as f32).floor().max(0.0) as usize).min(last);
                Some(Effect::Skin(frames[index]))
            }
            Self::Visible(visible) => first_step.then_some(Effect::Visible(*visible)),
            Self::Action(action) => first_step.then(|| Effect::Action(action.clone())),
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => f.debug_tuple("Color").field(c).finish(),
            Self::Opacity(o) => f.debug_tuple("Opacity").field(o).finish(),
            Self::Bounds { x, y, width, height } => f
                .debug_struct("Bounds")
                .field("x", x)
                .field("y", y)
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::Rotation(r) => f.debug_tuple("Rotation").field(r).finish(),
            Self::Visible(v) => f.debug_tuple("Visible").field(v).finish(),
            Self::Skin(frames) => f.debug_tuple("Skin").field(frames).finish(),
            Self::Action(_) => f.write_str("Action(..)"),
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + t * (to - from)
}

/// Node values captured when a group starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NodeSample {
    pub bounds: Rect,
    pub color: Color,
    pub opacity: f32,
    pub rotation: f32,
}

/// A value to write back to the node.
pub(crate) enum Effect {
    Color(Color),
    Opacity(f32),
    Bounds {
        x: Option<f32>,
        y: Option<f32>,
        width: Option<f32>,
        height: Option<f32>,
    },
    Rotation(f32),
    Visible(bool),
    Skin(SkinId),
    Action(Action),
}
