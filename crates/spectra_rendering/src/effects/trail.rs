//! Trails: a ribbon through the recent positions of a weapon or projectile.
//!
//! The host records positions with `EffectManager::push_trail_point`. Points
//! age one step per tick and fall off the tail after `trail_points` ticks.

use spectra_core::{Transform, Vec2};

use super::behavior::{EffectBehavior, RenderView, SpawnContext};
use super::lifecycle::EffectCore;
use super::spawn::{EffectKind, TrailStyle};
use super::strokes::{StrokeBuffer, StrokeStyle};
use crate::geometry::{ColorProfile, TrailHistory, WidthProfile};

/// Interpolated heads closer than this to the newest point are not prepended.
const HEAD_EPSILON: f32 = 0.01;

/// Ribbon through recorded positions.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    core: EffectCore,
    history: TrailHistory,
    age_step: f32,
    shape: TrailStyle,
}

impl Trail {
    /// Recorded points, newest first.
    #[must_use]
    pub fn history(&self) -> &TrailHistory {
        &self.history
    }

    /// Records the source's transform for this tick. The head moves there
    /// on the next tick, so rendering interpolates toward it.
    pub fn record(&mut self, transform: Transform) {
        self.core.stage(transform);
        self.history.push(transform.position, transform.rotation);
    }
}

impl EffectBehavior for Trail {
    const KIND: EffectKind = EffectKind::Trail;

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn on_spawn(&mut self, ctx: &mut SpawnContext<'_>) {
        self.history = TrailHistory::with_capacity(ctx.config.trail_points);
        self.age_step = 1.0 / self.history.capacity() as f32;
        self.shape = ctx.request.trail_style;
        self.history
            .push(ctx.request.position, ctx.request.rotation);
    }

    fn on_tick(&mut self) {
        self.history.advance_age(self.age_step);
    }

    fn emit(&self, view: &RenderView, out: &mut StrokeBuffer) {
        let style = &self.core.style;
        let width = style.base_width * self.core.scale;

        let (profile, offset) = match self.shape {
            TrailStyle::Swing => (WidthProfile::linear_taper(width), Vec2::ZERO),
            TrailStyle::Projectile { size } => (
                WidthProfile::inverse_lerp_bump(0.0, width),
                Vec2::from_angle(view.transform.rotation) * (-0.5 * size),
            ),
        };
        let stroke = StrokeStyle::themed(
            style,
            profile,
            ColorProfile::gradient(style.palette.primary, style.palette.secondary)
                .scaled(view.opacity),
        )
        .with_offset(offset);

        let head = view.transform.position;
        let newest = self.history.head().map(|p| p.position);
        out.push(stroke, |points| {
            if newest.map_or(true, |p| p.distance(head) > HEAD_EPSILON) {
                points.push(head);
            }
            self.history.write_positions(points);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::SpawnRequest;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use spectra_shared::{FxConfig, StyleDescriptor};

    fn spawn(trail_points: usize) -> Trail {
        let request = SpawnRequest::new(EffectKind::Trail, Vec2::new(1.0, 1.0));
        let config = FxConfig {
            trail_points,
            ..FxConfig::default()
        };
        let mut trail = Trail::default();
        *trail.core_mut() = EffectCore::spawn(&request, &StyleDescriptor::default());
        trail.on_spawn(&mut SpawnContext {
            request: &request,
            config: &config,
            rng: &mut ChaCha8Rng::seed_from_u64(0),
        });
        trail
    }

    #[test]
    fn test_points_expire_after_capacity_ticks() {
        let mut trail = spawn(4);
        assert_eq!(trail.history().len(), 1);
        for _ in 0..3 {
            trail.on_tick();
        }
        assert_eq!(trail.history().len(), 1);
        trail.on_tick();
        assert!(trail.history().is_empty());
    }

    #[test]
    fn test_emit_prepends_interpolated_head() {
        let mut trail = spawn(8);
        trail.record(Transform::at(Vec2::new(5.0, 1.0)));
        trail.core_mut().advance();
        trail.record(Transform::at(Vec2::new(9.0, 1.0)));
        trail.core_mut().advance();

        let view = RenderView {
            transform: trail.core().transform.sample(0.5),
            sub_tick: 0.5,
            ratio: 0.5,
            opacity: 1.0,
        };
        let mut out = StrokeBuffer::with_capacity(32, 1);
        trail.emit(&view, &mut out);
        let (points, _) = out.iter().next().unwrap();
        assert_eq!(
            points,
            &[
                Vec2::new(7.0, 1.0),
                Vec2::new(9.0, 1.0),
                Vec2::new(5.0, 1.0),
                Vec2::new(1.0, 1.0)
            ]
        );
    }

    #[test]
    fn test_projectile_trail_is_centered_behind_sprite() {
        let request = SpawnRequest::new(EffectKind::Trail, Vec2::new(1.0, 1.0))
            .with_trail_style(TrailStyle::Projectile { size: 8.0 });
        let mut trail = Trail::default();
        *trail.core_mut() = EffectCore::spawn(&request, &StyleDescriptor::default());
        trail.on_spawn(&mut SpawnContext {
            request: &request,
            config: &FxConfig::default(),
            rng: &mut ChaCha8Rng::seed_from_u64(0),
        });
        trail.record(Transform::at(Vec2::new(9.0, 1.0)));

        let view = RenderView {
            transform: trail.core().transform.current(),
            sub_tick: 1.0,
            ratio: 0.5,
            opacity: 1.0,
        };
        let mut out = StrokeBuffer::default();
        trail.emit(&view, &mut out);
        let (_, style) = out.iter().next().unwrap();
        assert_eq!(style.params.offset, Vec2::new(-4.0, 0.0));
    }
}
