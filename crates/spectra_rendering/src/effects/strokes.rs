//! Per-frame stroke list.
//!
//! Effects describe what to draw as strokes: a slice of polyline points plus
//! the profiles and pass tuning to draw them with. All strokes of a frame
//! share one point buffer that is cleared, never freed.

use spectra_core::Vec2;
use spectra_shared::StyleDescriptor;

use crate::compositor::CompositeParams;
use crate::geometry::{ColorProfile, WidthProfile};

/// How to draw one stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Width along the stroke.
    pub width: WidthProfile,
    /// Color along the stroke, opacity already applied.
    pub color: ColorProfile,
    /// Pass tuning.
    pub params: CompositeParams,
}

impl StrokeStyle {
    /// Stroke using a theme's pass multipliers and smoothing.
    #[must_use]
    pub fn themed(style: &StyleDescriptor, width: WidthProfile, color: ColorProfile) -> Self {
        let smoothing =
            (style.smoothing_segments >= 2).then_some(usize::from(style.smoothing_segments));
        Self {
            width,
            color,
            params: CompositeParams {
                smoothing,
                ..CompositeParams::new(style.bloom_multiplier, style.core_multiplier)
            },
        }
    }

    /// Overrides the smoothing sample count (`None` draws raw points).
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Option<usize>) -> Self {
        self.params.smoothing = smoothing;
        self
    }

    /// Shifts the whole stroke by `offset`.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.params.offset = offset;
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct Stroke {
    start: usize,
    end: usize,
    style: StrokeStyle,
}

/// Strokes collected for one frame.
#[derive(Debug, Default)]
pub struct StrokeBuffer {
    points: Vec<Vec2>,
    strokes: Vec<Stroke>,
}

impl StrokeBuffer {
    /// Buffer with room for `points` points across `strokes` strokes.
    #[must_use]
    pub fn with_capacity(points: usize, strokes: usize) -> Self {
        Self {
            points: Vec::with_capacity(points),
            strokes: Vec::with_capacity(strokes),
        }
    }

    /// Adds a stroke whose points `fill` appends, head first.
    ///
    /// Strokes with fewer than two points are dropped.
    pub fn push(&mut self, style: StrokeStyle, fill: impl FnOnce(&mut Vec<Vec2>)) {
        let start = self.points.len();
        fill(&mut self.points);
        let end = self.points.len();
        if end - start < 2 {
            self.points.truncate(start);
            return;
        }
        self.strokes.push(Stroke { start, end, style });
    }

    /// Number of strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// True when no strokes were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Strokes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[Vec2], &StrokeStyle)> + '_ {
        self.strokes
            .iter()
            .map(move |s| (&self.points[s.start..s.end], &s.style))
    }

    /// Drops every stroke, keeping the allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.strokes.clear();
    }
}
