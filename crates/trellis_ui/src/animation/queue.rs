//! Animation groups and the per-node FIFO that plays them.

use std::collections::VecDeque;

use super::easing::Easing;
use super::property::{Animation, Effect, NodeSample};

/// Parallel animations sharing one duration and easing.
#[derive(Debug, Clone)]
pub struct AnimationGroup {
    duration: f32,
    easing: Easing,
    animations: Vec<Animation>,
}

impl AnimationGroup {
    /// Creates a group. `duration` is in milliseconds.
    #[must_use]
    pub fn new(duration: f32, easing: Easing, animations: Vec<Animation>) -> Self {
        Self {
            duration,
            easing,
            animations,
        }
    }

    /// A group that changes nothing and only takes time.
    #[must_use]
    pub fn delay(duration: f32) -> Self {
        Self::new(duration, Easing::Linear, Vec::new())
    }

    /// Duration in milliseconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Easing applied to progress.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// The animations played in parallel.
    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }
}

/// Playback state of the group currently running on a node.
#[derive(Debug)]
pub(crate) struct AnimationState {
    group: AnimationGroup,
    start: NodeSample,
    progress: f32,
    started: bool,
}

/// Result of advancing the active group.
pub(crate) struct Step {
    pub consumed: f32,
    pub effects: Vec<Effect>,
    pub finished: bool,
}

impl AnimationState {
    fn new(group: AnimationGroup, start: NodeSample) -> Self {
        Self {
            group,
            start,
            progress: 0.0,
            started: false,
        }
    }

    fn advance(&mut self, remaining: f32) -> Step {
        let duration = self.group.duration;
        let consumed = remaining.min((duration - self.progress).max(0.0));
        self.progress += consumed;

        let t = if duration > 0.0 {
            (self.progress / duration).min(1.0)
        } else {
            1.0
        };
        let eased = self.group.easing.apply(t);
        let first_step = !self.started;
        self.started = true;

        let effects = self
            .group
            .animations
            .iter()
            .filter_map(|a| a.effect(&self.start, eased, first_step))
            .collect();

        Step {
            consumed,
            effects,
            finished: self.progress >= duration || duration.is_nan(),
        }
    }
}

/// FIFO of animation groups for one node.
#[derive(Debug, Default)]
pub struct AnimationQueue {
    pending: VecDeque<AnimationGroup>,
    active: Option<AnimationState>,
}

impl AnimationQueue {
    /// True when nothing is running or waiting.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    /// Number of groups left, including the running one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.active.is_some())
    }

    /// Same as [`AnimationQueue::is_done`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_done()
    }

    /// Progress of the running group in milliseconds.
    #[must_use]
    pub fn active_progress(&self) -> Option<f32> {
        self.active.as_ref().map(|state| state.progress)
    }

    pub(crate) fn push(&mut self, group: AnimationGroup) {
        self.pending.push_back(group);
    }

    /// Advances by at most `remaining` ms, starting the next group if none
    /// is running. `sample` reads the node's current values for a new group.
    pub(crate) fn step(&mut self, remaining: f32, sample: impl FnOnce() -> NodeSample) -> Option<Step> {
        if self.active.is_none() {
            let group = self.pending.pop_front()?;
            self.active = Some(AnimationState::new(group, sample()));
        }
        let state = self.active.as_mut()?;
        let step = state.advance(remaining);
        if step.finished {
            self.active = None;
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use crate::style::Color;

    fn sample() -> NodeSample {
        NodeSample {
            bounds: Rect::ZERO,
            color: Color::WHITE,
            opacity: 1.0,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_step_consumes_up_to_duration() {
        let mut queue = AnimationQueue::default();
        queue.push(AnimationGroup::new(100.0, Easing::Linear, vec![Animation::rotation(90.0)]));
        assert_eq!(queue.len(), 1);

        let step = queue.step(30.0, sample).unwrap();
        assert!((step.consumed - 30.0).abs() < f32::EPSILON);
        assert!(!step.finished);
        assert_eq!(queue.active_progress(), Some(30.0));

        let step = queue.step(500.0, sample).unwrap();
        assert!((step.consumed - 70.0).abs() < f32::EPSILON);
        assert!(step.finished);
        assert!(queue.is_done());
        assert!(queue.step(10.0, sample).is_none());
    }

    #[test]
    fn test_zero_duration_finishes_without_consuming() {
        let mut queue = AnimationQueue::default();
        queue.push(AnimationGroup::new(0.0, Easing::Linear, vec![Animation::opacity(0.0)]));
        let step = queue.step(16.0, sample).unwrap();
        assert!(step.consumed.abs() < f32::EPSILON);
        assert!(step.finished);
        assert!(matches!(step.effects.as_slice(), [Effect::Opacity(o)] if o.abs() < f32::EPSILON));
    }

    #[test]
    fn test_nan_duration_terminates() {
        let mut queue = AnimationQueue::default();
        queue.push(AnimationGroup::delay(f32::NAN));
        let step = queue.step(f32::INFINITY, sample).unwrap();
        assert!(step.finished);
        assert!(queue.is_done());
    }
}
