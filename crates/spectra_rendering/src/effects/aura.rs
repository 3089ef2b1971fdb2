//! Auras: a breathing ring around an entity with sparkles orbiting it.

use rand::Rng;
use spectra_core::math::wrap_angle;
use spectra_core::Vec2;
use std::f32::consts::TAU;

use super::behavior::{sub_particle_count, EffectBehavior, RenderView, SpawnContext, MAX_SUB_PARTICLES};
use super::lifecycle::EffectCore;
use super::spawn::EffectKind;
use super::strokes::{StrokeBuffer, StrokeStyle};
use crate::geometry::{ColorProfile, WidthProfile};

/// Ring radius in multiples of the theme's base width.
const RING_SCALE: f32 = 3.0;
/// Segments around the ring (the first point is repeated to close it).
const RING_SEGMENTS: usize = 32;
/// Radius swing of the breathing ring.
const BREATH_DEPTH: f32 = 0.06;
/// Points per sparkle streak.
const SPARKLE_POINTS: usize = 5;
/// Smoothing samples for sparkle streaks.
const SPARKLE_SEGMENTS: usize = 12;

#[derive(Clone, Copy, Debug, Default)]
struct Sparkle {
    angle: f32,
    speed: f32,
    /// Orbit radius as a fraction of the ring radius.
    orbit: f32,
    /// Angular length of the streak.
    length: f32,
}

/// Ring plus orbiting sparkles.
#[derive(Clone, Debug, Default)]
pub struct Aura {
    core: EffectCore,
    sparkles: [Sparkle; MAX_SUB_PARTICLES],
    sparkle_count: usize,
    breath_phase: f32,
}

impl Aura {
    /// Sparkles orbiting this aura.
    #[must_use]
    pub fn sparkle_count(&self) -> usize {
        self.sparkle_count
    }
}

impl EffectBehavior for Aura {
    const KIND: EffectKind = EffectKind::Aura;

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn on_spawn(&mut self, ctx: &mut SpawnContext<'_>) {
        let pulse = self.core.style.pulse_speed;
        self.breath_phase = ctx.rng.gen_range(0.0..TAU);
        self.sparkle_count = sub_particle_count(self.core.style.sub_particles);
        for sparkle in &mut self.sparkles[..self.sparkle_count] {
            *sparkle = Sparkle {
                angle: ctx.rng.gen_range(0.0..TAU),
                speed: pulse * ctx.rng.gen_range(0.6..1.4),
                orbit: ctx.rng.gen_range(0.8..1.25),
                length: ctx.rng.gen_range(0.25..0.5),
            };
        }
    }

    fn on_tick(&mut self) {
        self.breath_phase = wrap_angle(self.breath_phase + self.core.style.pulse_speed);
        for sparkle in &mut self.sparkles[..self.sparkle_count] {
            sparkle.angle = wrap_angle(sparkle.angle + sparkle.speed);
        }
    }

    fn emit(&self, view: &RenderView, out: &mut StrokeBuffer) {
        let style = &self.core.style;
        let scale = self.core.scale;
        let center = view.transform.position;
        let lag = 1.0 - view.sub_tick;

        let breath = self.breath_phase - style.pulse_speed * lag;
        let radius = style.base_width * RING_SCALE * scale * (1.0 + BREATH_DEPTH * breath.sin());

        let ring = StrokeStyle::themed(
            style,
            WidthProfile::Constant(style.base_width * scale * 0.35),
            ColorProfile::Solid(style.palette.primary).scaled(view.opacity * 0.7),
        )
        .with_smoothing(None);
        out.push(ring, |points| {
            for j in 0..=RING_SEGMENTS {
                let angle = TAU * j as f32 / RING_SEGMENTS as f32;
                points.push(center + Vec2::from_angle(angle) * radius);
            }
        });

        let streak = StrokeStyle::themed(
            style,
            WidthProfile::linear_taper(style.base_width * scale * 0.3),
            ColorProfile::gradient(style.palette.accent, style.palette.primary)
                .scaled(view.opacity),
        )
        .with_smoothing(Some(SPARKLE_SEGMENTS));
        for sparkle in &self.sparkles[..self.sparkle_count] {
            let head = sparkle.angle - sparkle.speed * lag;
            let orbit = radius * sparkle.orbit;
            out.push(streak, |points| {
                for j in 0..SPARKLE_POINTS {
                    let f = j as f32 / (SPARKLE_POINTS - 1) as f32;
                    points.push(center + Vec2::from_angle(head - sparkle.length * f) * orbit);
                }
            });
        }
    }
}
