//! Easing curves mapping linear progress to eased progress.

use std::f32::consts::PI;

use serde::Deserialize;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Quadratic, accelerating.
    QuadraticIn,
    /// Quadratic, decelerating.
    QuadraticOut,
    /// Quadratic, both ends.
    QuadraticInOut,
    /// Cubic, accelerating.
    CubicIn,
    /// Cubic, decelerating.
    CubicOut,
    /// Cubic, both ends.
    CubicInOut,
    /// Sine, accelerating.
    SineIn,
    /// Sine, decelerating.
    SineOut,
    /// Sine, both ends.
    SineInOut,
    /// Exponential ease-in (accelerating).
    ExponentialIn,
    /// Exponential ease-out (sharp snap to target).
    ExponentialOut,
    /// Exponential ease-in-out.
    ExponentialInOut,
    /// Jumps straight to the end value.
    Instant,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => t * (2.0 - t),
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Self::ExponentialIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * (t - 1.0))
                }
            }
            Self::ExponentialOut => {
                // 1 - 2^(-10t)
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::ExponentialInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::Instant => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 14] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExponentialIn,
        Easing::ExponentialOut,
        Easing::ExponentialInOut,
        Easing::Instant,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing:?} at 1");
            if easing != Easing::Instant {
                assert!(easing.apply(0.0).abs() < 1e-3, "{easing:?} at 0");
            }
        }
    }

    #[test]
    fn test_clamps_input() {
        assert!((Easing::Linear.apply(2.0) - 1.0).abs() < f32::EPSILON);
        assert!(Easing::Linear.apply(-1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_exponential_out_is_sharp() {
        assert!(Easing::ExponentialOut.apply(0.3) > 0.8);
        assert!(Easing::ExponentialIn.apply(0.3) < 0.01);
    }

    #[test]
    fn test_in_out_midpoint() {
        assert!((Easing::QuadraticInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }
}
