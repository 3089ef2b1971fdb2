//! Death spectacles: rays burst outwards from the body while a shockwave
//! ring expands and thins. Shape is driven by lifetime alone.

use rand::Rng;
use spectra_core::Vec2;
use std::f32::consts::TAU;

use super::behavior::{sub_particle_count, EffectBehavior, RenderView, SpawnContext, MAX_SUB_PARTICLES};
use super::lifecycle::EffectCore;
use super::spawn::EffectKind;
use super::strokes::{StrokeBuffer, StrokeStyle};
use crate::geometry::{ColorProfile, WidthProfile};

/// Final burst radius in multiples of the theme's base width.
const BURST_SCALE: f32 = 10.0;
/// Points per ray.
const RAY_POINTS: usize = 4;
/// Segments around the shockwave ring.
const RING_SEGMENTS: usize = 40;
/// Ray roots sit this far out, as a fraction of the current radius.
const RAY_ROOT: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default)]
struct Ray {
    angle: f32,
    /// Ray tip as a fraction of the burst radius.
    reach: f32,
}

/// Expanding rays plus shockwave.
#[derive(Clone, Debug, Default)]
pub struct DeathSpectacle {
    core: EffectCore,
    rays: [Ray; MAX_SUB_PARTICLES],
    ray_count: usize,
    /// Radians per tick the whole burst turns.
    spin: f32,
}

/// Cubic ease-out: fast start, soft landing.
#[inline]
fn ease_out(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

impl DeathSpectacle {
    /// Rays in this burst.
    #[must_use]
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Burst radius at lifetime `ratio`.
    #[must_use]
    pub fn radius_at(&self, ratio: f32) -> f32 {
        self.core.style.base_width * BURST_SCALE * self.core.scale * ease_out(ratio)
    }
}

impl EffectBehavior for DeathSpectacle {
    const KIND: EffectKind = EffectKind::Death;

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn on_spawn(&mut self, ctx: &mut SpawnContext<'_>) {
        self.ray_count = sub_particle_count(self.core.style.sub_particles);
        let spacing = TAU / self.ray_count.max(1) as f32;
        for (i, ray) in self.rays[..self.ray_count].iter_mut().enumerate() {
            *ray = Ray {
                angle: spacing * i as f32 + ctx.rng.gen_range(-0.2..0.2),
                reach: ctx.rng.gen_range(0.6..1.0),
            };
        }
        self.spin = self.core.style.pulse_speed * 0.25 * ctx.rng.gen_range(-1.0..1.0);
    }

    fn emit(&self, view: &RenderView, out: &mut StrokeBuffer) {
        let radius = self.radius_at(view.ratio);
        if radius <= f32::EPSILON {
            return;
        }

        let style = &self.core.style;
        let scale = self.core.scale;
        let center = view.transform.position;
        let thinning = 1.0 - 0.6 * view.ratio;
        let turn = self.spin * (self.core.elapsed as f32 - 1.0 + view.sub_tick);

        let ray_stroke = StrokeStyle::themed(
            style,
            WidthProfile::linear_taper(style.base_width * scale * thinning),
            ColorProfile::gradient(style.palette.accent, style.palette.secondary)
                .scaled(view.opacity),
        )
        .with_smoothing(None);
        for ray in &self.rays[..self.ray_count] {
            let direction = Vec2::from_angle(ray.angle + turn);
            let tip = radius * ray.reach;
            let root = radius * RAY_ROOT;
            if tip - root <= f32::EPSILON {
                continue;
            }
            out.push(ray_stroke, |points| {
                for j in 0..RAY_POINTS {
                    let f = j as f32 / (RAY_POINTS - 1) as f32;
                    points.push(center + direction * (tip + (root - tip) * f));
                }
            });
        }

        let ring = StrokeStyle::themed(
            style,
            WidthProfile::Constant(style.base_width * scale * 0.5 * (1.0 - view.ratio)),
            ColorProfile::Solid(style.palette.primary).scaled(view.opacity),
        )
        .with_smoothing(None);
        out.push(ring, |points| {
            for j in 0..=RING_SEGMENTS {
                let angle = TAU * j as f32 / RING_SEGMENTS as f32;
                points.push(center + Vec2::from_angle(angle) * radius);
            }
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

    fn spawn() -> DeathSpectacle {
        let request = SpawnRequest::new(EffectKind::Death, Vec2::new(-40.0, 25.0));
        let mut death = DeathSpectacle::default();
        *death.core_mut() = EffectCore::spawn(&request, &StyleDescriptor::default());
        death.on_spawn(&mut SpawnContext {
            request: &request,
            config: &FxConfig::default(),
            rng: &mut ChaCha8Rng::seed_from_u64(2),
        });
        death
    }

    #[test]
    fn test_radius_expands_monotonically() {
        let death = spawn();
        let mut last = -1.0;
        for step in 0..=20 {
            let r = death.radius_at(step as f32 / 20.0);
            assert!(r >= last);
            last = r;
        }
        assert_eq!(death.radius_at(0.0), 0.0);
        assert!((death.radius_at(1.0) - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_emits_rays_and_ring() {
        let death = spawn();
        let view = RenderView {
            transform: death.core().transform.current(),
            sub_tick: 0.5,
            ratio: 0.4,
            opacity: 0.8,
        };
        let mut out = StrokeBuffer::with_capacity(256, 16);
        death.emit(&view, &mut out);
        assert_eq!(out.len(), death.ray_count() + 1);
    }
}
