//! FX Renderer - one call per render frame
//!
//! ```text
//! EffectManager ──collect_strokes──► StrokeBuffer ──► MultiPassCompositor ──► DrawSink
//!                       ▲                                    ▲
//!              FrameContext.sub_tick                 GlowTextureCache
//! ```
//!
//! The sub-tick is sampled once per frame and shared by every effect, so
//! effects drawn in the same frame never disagree about time.

use spectra_core::TransformSource;
use spectra_shared::{FxConfig, RibbonLimits};

use crate::compositor::{
    CompositorStats, DrawSink, GlowTextureCache, MultiPassCompositor, TextureProvider,
};
use crate::effects::{EffectManager, StrokeBuffer};

/// Initial stroke point capacity.
const STROKE_POINTS: usize = 8192;
/// Initial stroke capacity.
const STROKE_COUNT: usize = 1024;

/// Per-frame timing input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    /// Render frame number.
    pub frame: u64,
    /// Fraction of the way from the previous simulation tick to the current
    /// one, in `[0, 1]`.
    pub sub_tick: f32,
}

impl FrameContext {
    /// Frame context with `sub_tick` clamped to `[0, 1]` (NaN becomes 1).
    #[must_use]
    pub fn new(frame: u64, sub_tick: f32) -> Self {
        let sub_tick = if sub_tick.is_finite() {
            sub_tick.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self { frame, sub_tick }
    }
}

/// What one frame drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Strokes composited.
    pub strokes: u32,
    /// Passes submitted to the sink.
    pub passes_drawn: u32,
    /// Passes with no geometry.
    pub passes_skipped: u32,
    /// Passes the sink rejected.
    pub passes_rejected: u32,
    /// Vertices submitted.
    pub vertices: usize,
    /// True if the glow texture was available.
    pub textured: bool,
}

/// Collects strokes from the effect manager and composites them.
pub struct FxRenderer {
    compositor: MultiPassCompositor,
    strokes: StrokeBuffer,
    last_frame: FrameStats,
}

impl FxRenderer {
    /// Renderer whose ribbons respect `limits`.
    #[must_use]
    pub fn new(limits: RibbonLimits) -> Self {
        Self {
            compositor: MultiPassCompositor::new(limits),
            strokes: StrokeBuffer::with_capacity(STROKE_POINTS, STROKE_COUNT),
            last_frame: FrameStats::default(),
        }
    }

    /// Renderer sized from `config`.
    #[must_use]
    pub fn from_config(config: &FxConfig) -> Self {
        Self::new(config.ribbon)
    }

    /// Renders every live effect for this frame.
    ///
    /// Must run on the render thread: this is where the glow texture gets
    /// created on first use.
    pub fn render<T, P, S>(
        &mut self,
        manager: &EffectManager,
        frame: FrameContext,
        transforms: &T,
        glow: &GlowTextureCache,
        textures: &mut P,
        sink: &mut S,
    ) -> FrameStats
    where
        T: TransformSource,
        P: TextureProvider,
        S: DrawSink,
    {
        glow.ensure_initialized(textures);
        let material = glow.material();

        self.strokes.clear();
        manager.collect_strokes(frame.sub_tick, transforms, &mut self.strokes);

        let mut stats = FrameStats {
            frame: frame.frame,
            textured: glow.get().is_some(),
            ..FrameStats::default()
        };
        for (points, style) in self.strokes.iter() {
            let outcome = self.compositor.render(
                points,
                &style.width,
                &style.color,
                &style.params,
                material,
                sink,
            );
            stats.strokes += 1;
            stats.passes_drawn += u32::from(outcome.drawn);
            stats.passes_skipped += u32::from(outcome.skipped);
            stats.passes_rejected += u32::from(outcome.rejected);
            stats.vertices += outcome.vertices;
        }

        if stats.passes_rejected > 0 {
            tracing::debug!(
                frame = frame.frame,
                rejected = stats.passes_rejected,
                "ribbon passes rejected this frame"
            );
        }
        self.last_frame = stats;
        stats
    }

    /// Stats of the most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Lifetime compositor counters.
    #[must_use]
    pub fn compositor_stats(&self) -> CompositorStats {
        self.compositor.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{Material, PassKind, RecordingSink, TextureHandle};
    use crate::effects::{EffectKind, SpawnRequest};
    use spectra_core::{EntityId, Transform, Vec2};

    struct Textures;

    impl TextureProvider for Textures {
        fn create_glow_texture(&mut self) -> Option<TextureHandle> {
            Some(TextureHandle(7))
        }
    }

    fn no_entities(_: EntityId) -> Option<Transform> {
        None
    }

    #[test]
    fn test_frame_context_clamps() {
        assert_eq!(FrameContext::new(1, 1.7).sub_tick, 1.0);
        assert_eq!(FrameContext::new(1, -0.3).sub_tick, 0.0);
        assert_eq!(FrameContext::new(1, f32::NAN).sub_tick, 1.0);
    }

    #[test]
    fn test_renders_three_passes_per_stroke() {
        let mut fx = EffectManager::with_defaults();
        fx.spawn(
            SpawnRequest::new(EffectKind::Telegraph, Vec2::new(10.0, 10.0))
                .with_length(150.0)
                .with_lifetime(100),
        );
        for _ in 0..40 {
            fx.tick();
        }

        let mut renderer = FxRenderer::from_config(fx.config());
        let glow = GlowTextureCache::new();
        let mut sink = RecordingSink::new();
        let stats = renderer.render(
            &fx,
            FrameContext::new(40, 0.5),
            &no_entities,
            &glow,
            &mut Textures,
            &mut sink,
        );

        assert_eq!(stats.strokes, 1);
        assert_eq!(stats.passes_drawn, 3);
        assert!(stats.textured);
        assert_eq!(sink.pass(PassKind::Bloom).count(), 1);
        assert!(sink
            .draws
            .iter()
            .all(|d| d.material == Material::Textured(TextureHandle(7))));
    }

    #[test]
    fn test_attached_effect_follows_entity() {
        let mut fx = EffectManager::with_defaults();
        let boss = EntityId(1);
        fx.spawn(
            SpawnRequest::new(EffectKind::Telegraph, Vec2::new(10.0, 10.0))
                .with_length(100.0)
                .attached_to(boss),
        );
        for _ in 0..30 {
            fx.tick();
        }

        let boss_at = |e: EntityId| (e == boss).then(|| Transform::at(Vec2::new(500.0, 500.0)));
        let mut renderer = FxRenderer::new(RibbonLimits::default());
        let mut sink = RecordingSink::new();
        renderer.render(
            &fx,
            FrameContext::new(0, 1.0),
            &boss_at,
            &GlowTextureCache::new(),
            &mut Textures,
            &mut sink,
        );

        let main = sink.pass(PassKind::Main).next().unwrap();
        let last = main.vertices[main.vertices.len() - 1].position();
        // The line's root sits on the boss, not the spawn point.
        assert!(last.distance(Vec2::new(500.0, 500.0)) < 20.0);
    }
}
