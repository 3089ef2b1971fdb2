//! # Multi-Pass Compositor
//!
//! Draws one polyline three times with additive blending:
//!
//! | Pass  | Width                | Color                        |
//! |-------|----------------------|------------------------------|
//! | Bloom | `w(t) * bloom`       | `c(t) * 0.3`                 |
//! | Main  | `w(t)`               | `c(t)`                       |
//! | Core  | `w(t) * core`        | `white * 0.8 * (1 - t)`      |
//!
//! Passes are independent: a skipped or rejected pass never stops the
//! others. Nothing here returns an error.

use spectra_core::{Color, Vec2};
use spectra_shared::RibbonLimits;

use super::draw::{DrawCall, DrawSink, Material, PassKind, SubmitError};
use crate::geometry::{ColorFn, PrimitiveSettings, RibbonBuilder, WidthFn};

/// Bloom pass color multiplier.
pub const BLOOM_INTENSITY: f32 = 0.3;
/// Core pass peak intensity (at the head).
pub const CORE_INTENSITY: f32 = 0.8;

/// Per-call tuning beyond the width and color functions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeParams {
    /// Bloom pass width multiplier.
    pub bloom_multiplier: f32,
    /// Core pass width multiplier.
    pub core_multiplier: f32,
    /// Catmull-Rom output samples; `None` tessellates the raw points.
    pub smoothing: Option<usize>,
    /// Constant centerline offset.
    pub offset: Vec2,
}

impl CompositeParams {
    /// Params with the given multipliers, no smoothing and no offset.
    #[must_use]
    pub const fn new(bloom_multiplier: f32, core_multiplier: f32) -> Self {
        Self {
            bloom_multiplier,
            core_multiplier,
            smoothing: None,
            offset: Vec2::ZERO,
        }
    }
}

/// Result of one composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeOutcome {
    /// Passes that reached the sink.
    pub drawn: u8,
    /// Passes with no geometry (degenerate input or over the caps).
    pub skipped: u8,
    /// Passes the sink rejected.
    pub rejected: u8,
    /// Vertices submitted across all drawn passes.
    pub vertices: usize,
}

impl CompositeOutcome {
    fn absorb(&mut self, pass: PassResult) {
        match pass {
            PassResult::Drawn { vertices } => {
                self.drawn += 1;
                self.vertices += vertices;
            }
            PassResult::Skipped => self.skipped += 1,
            PassResult::Rejected => self.rejected += 1,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum PassResult {
    Drawn { vertices: usize },
    Skipped,
    Rejected,
}

/// Lifetime counters for a compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositorStats {
    /// Composite calls.
    pub composites: u64,
    /// Passes drawn.
    pub passes_drawn: u64,
    /// Passes skipped for lack of geometry.
    pub passes_skipped: u64,
    /// Passes the sink rejected outright.
    pub passes_rejected: u64,
    /// Textured passes retried with the flat-color material.
    pub flat_fallbacks: u64,
}

/// Three-pass ribbon renderer around one shared [`RibbonBuilder`].
pub struct MultiPassCompositor {
    builder: RibbonBuilder,
    stats: CompositorStats,
}

impl MultiPassCompositor {
    /// Creates a compositor whose builder enforces `limits`.
    #[must_use]
    pub fn new(limits: RibbonLimits) -> Self {
        Self {
            builder: RibbonBuilder::new(limits),
            stats: CompositorStats::default(),
        }
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// The shared builder's caps.
    #[must_use]
    pub fn limits(&self) -> RibbonLimits {
        self.builder.limits()
    }

    /// Bloom, main and core passes over `polyline`, smoothed with the
    /// default segment count.
    #[allow(clippy::too_many_arguments)]
    pub fn render_multi_pass<W, C, S>(
        &mut self,
        polyline: &[Vec2],
        width: &W,
        color: &C,
        bloom_multiplier: f32,
        core_multiplier: f32,
        material: Material,
        sink: &mut S,
    ) -> CompositeOutcome
    where
        W: WidthFn,
        C: ColorFn,
        S: DrawSink,
    {
        let params = CompositeParams {
            smoothing: Some(self.builder.limits().default_segments),
            ..CompositeParams::new(bloom_multiplier, core_multiplier)
        };
        self.render(polyline, width, color, &params, material, sink)
    }

    /// Bloom, main and core passes over `polyline` with explicit params.
    pub fn render<W, C, S>(
        &mut self,
        polyline: &[Vec2],
        width: &W,
        color: &C,
        params: &CompositeParams,
        material: Material,
        sink: &mut S,
    ) -> CompositeOutcome
    where
        W: WidthFn,
        C: ColorFn,
        S: DrawSink,
    {
        self.stats.composites += 1;
        let mut outcome = CompositeOutcome::default();

        let bloom = params.bloom_multiplier;
        let core = params.core_multiplier;

        let bloom_settings = PrimitiveSettings {
            width: |t: f32| width.width(t) * bloom,
            color: |t: f32| color.color(t) * BLOOM_INTENSITY,
            offset: params.offset,
            smoothing: params.smoothing,
        };
        outcome.absorb(self.pass(PassKind::Bloom, polyline, &bloom_settings, material, sink));

        let main_settings = PrimitiveSettings {
            width: |t: f32| width.width(t),
            color: |t: f32| color.color(t),
            offset: params.offset,
            smoothing: params.smoothing,
        };
        outcome.absorb(self.pass(PassKind::Main, polyline, &main_settings, material, sink));

        let core_settings = PrimitiveSettings {
            width: |t: f32| width.width(t) * core,
            color: |t: f32| Color::WHITE * (CORE_INTENSITY * (1.0 - t)),
            offset: params.offset,
            smoothing: params.smoothing,
        };
        outcome.absorb(self.pass(PassKind::Core, polyline, &core_settings, material, sink));

        outcome
    }

    fn pass<W, C, S>(
        &mut self,
        pass: PassKind,
        polyline: &[Vec2],
        settings: &PrimitiveSettings<W, C>,
        material: Material,
        sink: &mut S,
    ) -> PassResult
    where
        W: WidthFn,
        C: ColorFn,
        S: DrawSink,
    {
        let mesh = self.builder.build(polyline, settings);
        if mesh.is_empty() {
            self.stats.passes_skipped += 1;
            return PassResult::Skipped;
        }
        let vertices = mesh.vertices.len();

        let call = DrawCall {
            pass,
            material,
            mesh,
        };
        let result = match sink.submit(&call) {
            Err(SubmitError::MissingParameter(name)) if material != Material::FlatColor => {
                tracing::debug!(?pass, parameter = name, "retrying ribbon pass without texture");
                self.stats.flat_fallbacks += 1;
                sink.submit(&DrawCall {
                    material: Material::FlatColor,
                    ..call
                })
            }
            other => other,
        };

        match result {
            Ok(()) => {
                self.stats.passes_drawn += 1;
                PassResult::Drawn { vertices }
            }
            Err(err) => {
                tracing::debug!(?pass, %err, "ribbon pass rejected");
                self.stats.passes_rejected += 1;
                PassResult::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{RecordedDraw, RecordingSink, TextureHandle};
    use crate::geometry::{ColorProfile, WidthProfile};

    fn polyline() -> Vec<Vec2> {
        (1..=6).map(|i| Vec2::new(i as f32 * 10.0, 5.0)).collect()
    }

    #[test]
    fn test_three_passes_in_order() {
        let mut compositor = MultiPassCompositor::new(RibbonLimits::default());
        let mut sink = RecordingSink::new();
        let outcome = compositor.render(
            &polyline(),
            &WidthProfile::Constant(10.0),
            &ColorProfile::Solid(Color::rgb(1.0, 0.5, 0.0)),
            &CompositeParams::new(2.5, 0.4),
            Material::FlatColor,
            &mut sink,
        );
        assert_eq!(outcome.drawn, 3);
        let order: Vec<PassKind> = sink.draws.iter().map(|d| d.pass).collect();
        assert_eq!(order, PassKind::ALL.to_vec());
    }

    #[test]
    fn test_pass_widths_and_colors() {
        let mut compositor = MultiPassCompositor::new(RibbonLimits::default());
        let mut sink = RecordingSink::new();
        compositor.render(
            &polyline(),
            &WidthProfile::Constant(10.0),
            &ColorProfile::Solid(Color::rgb(1.0, 0.5, 0.0)),
            &CompositeParams::new(2.0, 0.5),
            Material::FlatColor,
            &mut sink,
        );

        let half_width = |d: &RecordedDraw| {
            (d.vertices[0].position[1] - d.vertices[1].position[1]) / 2.0
        };
        assert!((half_width(&sink.draws[0]) - 10.0).abs() < 1e-4);
        assert!((half_width(&sink.draws[1]) - 5.0).abs() < 1e-4);
        assert!((half_width(&sink.draws[2]) - 2.5).abs() < 1e-4);

        let bloom_head = sink.draws[0].vertices[0].color;
        assert!((bloom_head[0] - 0.3).abs() < 1e-6);
        assert_eq!(sink.draws[1].vertices[0].color, [1.0, 0.5, 0.0, 0.0]);

        let core = &sink.draws[2].vertices;
        assert!((core[0].color[0] - 0.8).abs() < 1e-6);
        assert!(core[core.len() - 1].color[0].abs() < 1e-6);
    }

    struct RejectBloom(RecordingSink);

    impl DrawSink for RejectBloom {
        fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError> {
            if call.pass == PassKind::Bloom {
                return Err(SubmitError::BufferFull {
                    vertices: call.mesh.vertices.len(),
                });
            }
            self.0.submit(call)
        }
    }

    #[test]
    fn test_rejected_pass_does_not_stop_others() {
        let mut compositor = MultiPassCompositor::new(RibbonLimits::default());
        let mut sink = RejectBloom(RecordingSink::new());
        let outcome = compositor.render_multi_pass(
            &polyline(),
            &WidthProfile::quadratic_bump(8.0),
            &ColorProfile::default(),
            2.5,
            0.4,
            Material::FlatColor,
            &mut sink,
        );
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.drawn, 2);
        assert_eq!(sink.0.pass(PassKind::Main).count(), 1);
        assert_eq!(sink.0.pass(PassKind::Core).count(), 1);
    }

    struct NoTextureSlot(RecordingSink);

    impl DrawSink for NoTextureSlot {
        fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError> {
            if matches!(call.material, Material::Textured(_)) {
                return Err(SubmitError::MissingParameter("glow_texture"));
            }
            self.0.submit(call)
        }
    }

    #[test]
    fn test_missing_parameter_falls_back_to_flat() {
        let mut compositor = MultiPassCompositor::new(RibbonLimits::default());
        let mut sink = NoTextureSlot(RecordingSink::new());
        let outcome = compositor.render_multi_pass(
            &polyline(),
            &WidthProfile::Constant(4.0),
            &ColorProfile::default(),
            2.5,
            0.4,
            Material::Textured(TextureHandle(1)),
            &mut sink,
        );
        assert_eq!(outcome.drawn, 3);
        assert_eq!(compositor.stats().flat_fallbacks, 3);
        assert!(sink.0.draws.iter().all(|d| d.material == Material::FlatColor));
    }

    #[test]
    fn test_degenerate_polyline_skips_all_passes() {
        let mut compositor = MultiPassCompositor::new(RibbonLimits::default());
        let mut sink = RecordingSink::new();
        let outcome = compositor.render_multi_pass(
            &[Vec2::new(3.0, 3.0)],
            &WidthProfile::Constant(4.0),
            &ColorProfile::default(),
            2.5,
            0.4,
            Material::FlatColor,
            &mut sink,
        );
        assert_eq!(outcome.skipped, 3);
        assert!(sink.draws.is_empty());
    }
}
