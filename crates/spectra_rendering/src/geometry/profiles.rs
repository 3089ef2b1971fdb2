//! # Width & Color Profiles
//!
//! A ribbon's look is two functions of progress along the trail
//! (`0.0` = head, `1.0` = tail): one for width, one for color. Hosts can pass
//! any closure; the named presets below cover the shapes effects actually use
//! and are plain data, so they live inside pooled instances without boxing.
//!
//! ```rust
//! use spectra_rendering::geometry::{WidthFn, WidthProfile};
//!
//! let bump = WidthProfile::quadratic_bump(10.0);
//! assert_eq!(bump.width(0.0), 0.0);
//! assert!((bump.width(0.5) - 10.0).abs() < 1e-5);
//!
//! // Closures work too.
//! let custom = |t: f32| 4.0 * (1.0 - t);
//! assert_eq!(custom.width(0.0), 4.0);
//! ```

use spectra_core::math::{bump, lerp};
use spectra_core::{Color, Vec2};
use std::f32::consts::PI;

/// Width used when a width function produces garbage.
pub const DEFAULT_WIDTH: f32 = 1.0;

/// Start of the head-side ramp in [`WidthProfile::InverseLerpBump`].
const BUMP_RAMP_UP_START: f32 = 0.06;
/// End of the tail-side ramp in [`WidthProfile::InverseLerpBump`].
const BUMP_RAMP_DOWN_END: f32 = 0.9;
/// Default end of the head-side ramp.
const BUMP_RAMP_UP_END: f32 = 0.27;
/// Default start of the tail-side ramp.
const BUMP_RAMP_DOWN_START: f32 = 0.72;

/// Width as a function of trail progress.
pub trait WidthFn {
    /// Ribbon width at `progress` in `[0, 1]`.
    fn width(&self, progress: f32) -> f32;
}

impl<F: Fn(f32) -> f32> WidthFn for F {
    #[inline]
    fn width(&self, progress: f32) -> f32 {
        self(progress)
    }
}

/// Color as a function of trail progress.
pub trait ColorFn {
    /// Ribbon color at `progress` in `[0, 1]`.
    fn color(&self, progress: f32) -> Color;
}

impl<F: Fn(f32) -> Color> ColorFn for F {
    #[inline]
    fn color(&self, progress: f32) -> Color {
        self(progress)
    }
}

/// Positional offset as a function of trail progress.
pub trait OffsetFn {
    /// Offset added to the centerline at `progress`.
    fn offset(&self, progress: f32) -> Vec2;
}

impl<F: Fn(f32) -> Vec2> OffsetFn for F {
    #[inline]
    fn offset(&self, progress: f32) -> Vec2 {
        self(progress)
    }
}

/// A constant offset (projectile-size centering).
impl OffsetFn for Vec2 {
    #[inline]
    fn offset(&self, _progress: f32) -> Vec2 {
        *self
    }
}

/// Named width shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidthProfile {
    /// Same width everywhere.
    Constant(f32),
    /// `start` at the head, shrinking linearly to zero at the tail.
    LinearTaper {
        /// Width at the head.
        start: f32,
    },
    /// `max * sin(progress * PI)`: zero at both ends, `max` at the middle.
    QuadraticBump {
        /// Width at the middle.
        max: f32,
    },
    /// `min` outside the ramps, `max` on the plateau between them.
    ///
    /// Ramps run `[0.06, ramp_up_end]` and `[ramp_down_start, 0.9]`.
    InverseLerpBump {
        /// Width outside the ramps.
        min: f32,
        /// Width on the plateau.
        max: f32,
        /// Progress where the head ramp reaches `max`.
        ramp_up_end: f32,
        /// Progress where the tail ramp starts falling.
        ramp_down_start: f32,
    },
}

impl WidthProfile {
    /// Linear taper from `start` to zero.
    #[must_use]
    pub const fn linear_taper(start: f32) -> Self {
        Self::LinearTaper { start }
    }

    /// Sine bump peaking at `max`.
    #[must_use]
    pub const fn quadratic_bump(max: f32) -> Self {
        Self::QuadraticBump { max }
    }

    /// Soft head and tail with the default ramp positions (0.27 / 0.72).
    #[must_use]
    pub const fn inverse_lerp_bump(min: f32, max: f32) -> Self {
        Self::InverseLerpBump {
            min,
            max,
            ramp_up_end: BUMP_RAMP_UP_END,
            ramp_down_start: BUMP_RAMP_DOWN_START,
        }
    }

    /// Soft head and tail with custom inner ramp positions.
    #[must_use]
    pub const fn inverse_lerp_bump_with(
        min: f32,
        max: f32,
        ramp_up_end: f32,
        ramp_down_start: f32,
    ) -> Self {
        Self::InverseLerpBump {
            min,
            max,
            ramp_up_end,
            ramp_down_start,
        }
    }

    /// Same shape, every width multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            Self::Constant(w) => Self::Constant(w * factor),
            Self::LinearTaper { start } => Self::LinearTaper {
                start: start * factor,
            },
            Self::QuadraticBump { max } => Self::QuadraticBump { max: max * factor },
            Self::InverseLerpBump {
                min,
                max,
                ramp_up_end,
                ramp_down_start,
            } => Self::InverseLerpBump {
                min: min * factor,
                max: max * factor,
                ramp_up_end,
                ramp_down_start,
            },
        }
    }
}

impl Default for WidthProfile {
    fn default() -> Self {
        Self::Constant(DEFAULT_WIDTH)
    }
}

impl WidthFn for WidthProfile {
    #[inline]
    fn width(&self, progress: f32) -> f32 {
        match *self {
            Self::Constant(w) => w,
            Self::LinearTaper { start } => start * (1.0 - progress),
            Self::QuadraticBump { max } => max * (progress * PI).sin(),
            Self::InverseLerpBump {
                min,
                max,
                ramp_up_end,
                ramp_down_start,
            } => {
                let envelope = bump(
                    BUMP_RAMP_UP_START,
                    ramp_up_end,
                    ramp_down_start,
                    BUMP_RAMP_DOWN_END,
                    progress,
                );
                lerp(min, max, envelope)
            }
        }
    }
}

/// Named color shapes.
///
/// Opacity is folded into the colors with [`ColorProfile::scaled`]; the
/// additive passes ignore alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorProfile {
    /// Same color everywhere.
    Solid(Color),
    /// `head` at progress 0 blending to `tail` at progress 1.
    Gradient {
        /// Color at the head.
        head: Color,
        /// Color at the tail.
        tail: Color,
    },
    /// `color` scaled by a trapezoid envelope over progress.
    BumpOpacity {
        /// Color on the plateau.
        color: Color,
        /// `[ramp_up_start, ramp_up_end, ramp_down_start, ramp_down_end]`.
        ramps: [f32; 4],
    },
}

impl ColorProfile {
    /// Gradient from `head` to `tail`.
    #[must_use]
    pub const fn gradient(head: Color, tail: Color) -> Self {
        Self::Gradient { head, tail }
    }

    /// Trapezoid opacity envelope over `color`.
    #[must_use]
    pub const fn bump_opacity(color: Color, ramps: [f32; 4]) -> Self {
        Self::BumpOpacity { color, ramps }
    }

    /// Same shape with every color multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            Self::Solid(c) => Self::Solid(c * factor),
            Self::Gradient { head, tail } => Self::Gradient {
                head: head * factor,
                tail: tail * factor,
            },
            Self::BumpOpacity { color, ramps } => Self::BumpOpacity {
                color: color * factor,
                ramps,
            },
        }
    }
}

impl Default for ColorProfile {
    fn default() -> Self {
        Self::Solid(Color::WHITE)
    }
}

impl ColorFn for ColorProfile {
    #[inline]
    fn color(&self, progress: f32) -> Color {
        match *self {
            Self::Solid(c) => c,
            Self::Gradient { head, tail } => head.lerp(tail, progress),
            Self::BumpOpacity { color, ramps } => {
                let [a, b, c, d] = ramps;
                color * bump(a, b, c, d, progress)
            }
        }
    }
}

/// Everything a ribbon build needs besides the polyline.
///
/// The default is a constant [`DEFAULT_WIDTH`] white ribbon with no offset
/// and no smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveSettings<W, C, O = Vec2> {
    /// Width function.
    pub width: W,
    /// Color function.
    pub color: C,
    /// Centerline offset function.
    pub offset: O,
    /// Catmull-Rom output sample count; `None` tessellates the raw points.
    pub smoothing: Option<usize>,
}

impl<W: WidthFn, C: ColorFn> PrimitiveSettings<W, C> {
    /// Settings with no offset and no smoothing.
    #[must_use]
    pub fn new(width: W, color: C) -> Self {
        Self {
            width,
            color,
            offset: Vec2::ZERO,
            smoothing: None,
        }
    }
}

impl<W: WidthFn, C: ColorFn, O: OffsetFn> PrimitiveSettings<W, C, O> {
    /// Resample to `samples` points before tessellating.
    #[must_use]
    pub fn smoothed(mut self, samples: usize) -> Self {
        self.smoothing = Some(samples);
        self
    }

    /// Replaces the offset function.
    #[must_use]
    pub fn with_offset<O2: OffsetFn>(self, offset: O2) -> PrimitiveSettings<W, C, O2> {
        PrimitiveSettings {
            width: self.width,
            color: self.color,
            offset,
            smoothing: self.smoothing,
        }
    }

    /// Width at `progress`, with non-finite results replaced by
    /// [`DEFAULT_WIDTH`] and negative results clamped to zero.
    #[inline]
    #[must_use]
    pub fn width_at(&self, progress: f32) -> f32 {
        let w = self.width.width(progress);
        if w.is_finite() {
            w.max(0.0)
        } else {
            DEFAULT_WIDTH
        }
    }

    /// Color at `progress`, non-finite results replaced by white.
    #[inline]
    #[must_use]
    pub fn color_at(&self, progress: f32) -> Color {
        let c = self.color.color(progress);
        if c.is_finite() {
            c
        } else {
            Color::WHITE
        }
    }

    /// Offset at `progress`, non-finite results replaced by zero.
    #[inline]
    #[must_use]
    pub fn offset_at(&self, progress: f32) -> Vec2 {
        let o = self.offset.offset(progress);
        if o.is_finite() {
            o
        } else {
            Vec2::ZERO
        }
    }
}

impl Default for PrimitiveSettings<WidthProfile, ColorProfile> {
    fn default() -> Self {
        Self::new(WidthProfile::default(), ColorProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_linear_taper() {
        let taper = WidthProfile::linear_taper(8.0);
        assert_eq!(taper.width(0.0), 8.0);
        assert_eq!(taper.width(0.5), 4.0);
        assert_eq!(taper.width(1.0), 0.0);
    }

    #[test]
    fn test_quadratic_bump_boundaries() {
        let b = WidthProfile::quadratic_bump(12.0);
        assert!(b.width(0.0).abs() < EPS);
        assert!((b.width(0.5) - 12.0).abs() < EPS);
        assert!(b.width(1.0).abs() < EPS);
    }

    #[test]
    fn test_inverse_lerp_bump_plateau_and_edges() {
        let b = WidthProfile::inverse_lerp_bump(2.0, 10.0);
        assert_eq!(b.width(0.0), 2.0);
        assert_eq!(b.width(0.06), 2.0);
        assert_eq!(b.width(0.27), 10.0);
        assert_eq!(b.width(0.5), 10.0);
        assert_eq!(b.width(0.72), 10.0);
        assert_eq!(b.width(0.95), 2.0);

        let mid_ramp = b.width((0.06 + 0.27) / 2.0);
        assert!((mid_ramp - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_scaled_width() {
        let b = WidthProfile::quadratic_bump(4.0).scaled(2.5);
        assert!((b.width(0.5) - 10.0).abs() < EPS);
        assert_eq!(WidthProfile::Constant(3.0).scaled(2.0).width(0.7), 6.0);
    }

    #[test]
    fn test_gradient_color() {
        let g = ColorProfile::gradient(Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 0.0, 1.0));
        assert_eq!(g.color(0.0), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(g.color(1.0), Color::rgb(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_bump_opacity_color() {
        let c = ColorProfile::bump_opacity(Color::WHITE, [0.0, 0.25, 0.75, 1.0]);
        assert_eq!(c.color(0.5), Color::WHITE);
        assert_eq!(c.color(0.0), Color::TRANSPARENT);
        let ramp = c.color(0.125);
        assert!((ramp.r - 0.5).abs() < EPS);
    }

    #[test]
    fn test_settings_sanitize_bad_outputs() {
        let settings = PrimitiveSettings::new(|_t: f32| f32::NAN, |_t: f32| {
            Color::new(f32::INFINITY, 0.0, 0.0, 1.0)
        });
        assert_eq!(settings.width_at(0.3), DEFAULT_WIDTH);
        assert_eq!(settings.color_at(0.3), Color::WHITE);

        let negative = PrimitiveSettings::new(|_t: f32| -4.0, ColorProfile::default());
        assert_eq!(negative.width_at(0.3), 0.0);
    }

    #[test]
    fn test_default_settings_are_constant_white() {
        let settings = PrimitiveSettings::default();
        assert_eq!(settings.width_at(0.0), DEFAULT_WIDTH);
        assert_eq!(settings.width_at(1.0), DEFAULT_WIDTH);
        assert_eq!(settings.color_at(0.5), Color::WHITE);
        assert_eq!(settings.offset_at(0.5), Vec2::ZERO);
        assert!(settings.smoothing.is_none());
    }
}
