//! Per-node animation queues.
//!
//! A node's animations are grouped: every [`Animation`] in an
//! [`AnimationGroup`] runs in parallel over the group's duration and easing,
//! and groups on the same node play strictly one after another. Durations
//! and deltas are in milliseconds.

mod easing;
mod engine;
mod property;
mod queue;

pub use easing::Easing;
pub use property::Animation;
pub use queue::{AnimationGroup, AnimationQueue};
