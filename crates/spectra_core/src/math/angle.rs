//! Angle helpers.

use std::f32::consts::{PI, TAU};

/// Wraps an angle into `[-PI, PI)`.
#[inline]
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Interpolates from `from` to `to` along the shortest arc.
///
/// A naive lerp between 3.1 and -3.1 sweeps the long way round and makes
/// rotating effects visibly snap at the +/-PI seam.
#[inline]
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = wrap_angle(to - from);
    wrap_angle(from + delta * t)
}
