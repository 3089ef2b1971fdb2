//! Catmull-Rom resampling.
//!
//! Trail histories are sparse (one point per tick). Resampling them through a
//! Catmull-Rom spline before tessellation removes the visible kinks. Neighbour
//! indices are clamped at the ends, so the curve passes through the first and
//! last input points exactly.

use spectra_core::Vec2;

/// Resamples `points` into `output_count` evenly spaced curve samples.
///
/// See [`resample_into`] for the rules; this variant allocates.
#[must_use]
pub fn resample(points: &[Vec2], output_count: usize) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(output_count.max(1));
    resample_into(points, output_count, &mut out);
    out
}

/// Resamples `points` into `out`, replacing its contents.
///
/// - empty input leaves `out` empty
/// - `output_count <= 1` (or a single input point) yields `[points[0]]`
/// - fewer than 4 input points interpolate linearly
/// - the first and last outputs equal the first and last inputs exactly
pub fn resample_into(points: &[Vec2], output_count: usize, out: &mut Vec<Vec2>) {
    out.clear();
    let Some(&first) = points.first() else {
        return;
    };
    if output_count <= 1 || points.len() == 1 {
        out.push(first);
        return;
    }

    let last_segment = points.len() - 2;
    let span = (points.len() - 1) as f32;
    let step = span / (output_count - 1) as f32;

    for i in 0..output_count {
        let t = i as f32 * step;
        // Truncation is the floor here: t is never negative.
        let segment = (t as usize).min(last_segment);
        let local = (t - segment as f32).clamp(0.0, 1.0);

        let point = if points.len() < 4 {
            points[segment].lerp(points[segment + 1], local)
        } else {
            let p0 = points[segment.saturating_sub(1)];
            let p1 = points[segment];
            let p2 = points[segment + 1];
            let p3 = points[(segment + 2).min(points.len() - 1)];
            catmull_rom(p0, p1, p2, p3, local)
        };
        out.push(point);
    }

    out[0] = first;
    out[output_count - 1] = points[points.len() - 1];
}

/// Uniform Catmull-Rom between `p1` and `p2`.
#[inline]
fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * (2.0 * b
            + (c - a) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (3.0 * b - a - 3.0 * c + d) * t3)
    };
    Vec2::new(
        axis(p0.x, p1.x, p2.x, p3.x),
        axis(p0.y, p1.y, p2.y, p3.y),
    )
}
