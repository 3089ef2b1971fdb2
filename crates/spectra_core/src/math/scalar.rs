//! Scalar ramps shared by width profiles, opacity envelopes and lifecycles.

/// Linear interpolation.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `value` between `from` and `to`, clamped to `[0, 1]`.
///
/// Degenerate ranges (`from == to`) step: 0 below, 1 at or above.
#[inline]
#[must_use]
pub fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    let span = to - from;
    if span.abs() <= f32::EPSILON {
        return if value < from { 0.0 } else { 1.0 };
    }
    ((value - from) / span).clamp(0.0, 1.0)
}

/// Trapezoid envelope: 0 outside `[ramp_up_start, ramp_down_end]`, 1 inside
/// `[ramp_up_end, ramp_down_start]`, linear within each ramp.
#[inline]
#[must_use]
pub fn bump(
    ramp_up_start: f32,
    ramp_up_end: f32,
    ramp_down_start: f32,
    ramp_down_end: f32,
    t: f32,
) -> f32 {
    if t < ramp_up_start || t > ramp_down_end {
        return 0.0;
    }
    let up = inverse_lerp(ramp_up_start, ramp_up_end, t);
    let down = 1.0 - inverse_lerp(ramp_down_start, ramp_down_end, t);
    up.min(down)
}
