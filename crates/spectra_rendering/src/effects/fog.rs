//! # Fog Clouds
//!
//! A cloud is a handful of curling wisps orbiting a drifting center. The
//! center drifts with damped velocity and settles; each wisp circles at its
//! own radius, speed and phase offset.

use rand::Rng;
use spectra_core::math::wrap_angle;
use spectra_core::Vec2;
use std::f32::consts::{PI, TAU};

use super::behavior::{sub_particle_count, EffectBehavior, RenderView, SpawnContext, MAX_SUB_PARTICLES};
use super::lifecycle::EffectCore;
use super::spawn::EffectKind;
use super::strokes::{StrokeBuffer, StrokeStyle};
use crate::geometry::{ColorProfile, WidthProfile};

/// Cloud radius in multiples of the theme's base width.
const RADIUS_SCALE: f32 = 4.0;
/// Points per wisp before smoothing.
const WISP_POINTS: usize = 7;
/// Fog is a background layer; it never reaches full palette brightness.
const FOG_INTENSITY: f32 = 0.6;
/// Radial bulge along a wisp.
const CURL: f32 = 0.12;

#[derive(Clone, Copy, Debug, Default)]
struct Wisp {
    /// Angle of the wisp head after the last tick.
    angle: f32,
    /// Radians per tick; sign is the orbit direction.
    speed: f32,
    /// Orbit radius as a fraction of the cloud radius.
    radius: f32,
    /// Angular length of the wisp.
    arc: f32,
}

/// Drifting atmospheric puff.
#[derive(Clone, Debug, Default)]
pub struct FogCloud {
    core: EffectCore,
    wisps: [Wisp; MAX_SUB_PARTICLES],
    wisp_count: usize,
}

impl FogCloud {
    /// Wisps in this cloud.
    #[must_use]
    pub fn wisp_count(&self) -> usize {
        self.wisp_count
    }

    /// Head angle of each wisp after the last tick.
    pub fn wisp_angles(&self) -> impl Iterator<Item = f32> + '_ {
        self.wisps[..self.wisp_count].iter().map(|w| w.angle)
    }
}

impl EffectBehavior for FogCloud {
    const KIND: EffectKind = EffectKind::Fog;

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn on_spawn(&mut self, ctx: &mut SpawnContext<'_>) {
        let style = self.core.style;
        self.core.damping = style.velocity_damping;
        self.wisp_count = sub_particle_count(style.sub_particles);

        for wisp in &mut self.wisps[..self.wisp_count] {
            let direction = if ctx.rng.gen::<bool>() { 1.0 } else { -1.0 };
            *wisp = Wisp {
                angle: ctx.rng.gen_range(0.0..TAU),
                speed: style.pulse_speed * ctx.rng.gen_range(0.5..1.5) * direction,
                radius: ctx.rng.gen_range(0.4..1.0),
                arc: ctx.rng.gen_range(0.8..1.6),
            };
        }
    }

    fn on_tick(&mut self) {
        for wisp in &mut self.wisps[..self.wisp_count] {
            wisp.angle = wrap_angle(wisp.angle + wisp.speed);
        }
    }

    fn emit(&self, view: &RenderView, out: &mut StrokeBuffer) {
        let style = &self.core.style;
        let scale = self.core.scale;
        let center = view.transform.position;
        let cloud_radius = style.base_width * RADIUS_SCALE * scale;

        let stroke = StrokeStyle::themed(
            style,
            WidthProfile::quadratic_bump(style.base_width * scale * 0.8),
            ColorProfile::bump_opacity(style.palette.primary, [0.0, 0.15, 0.6, 1.0])
                .scaled(view.opacity * FOG_INTENSITY),
        );

        for wisp in &self.wisps[..self.wisp_count] {
            // Step back from the post-tick angle towards the previous one.
            let head = wisp.angle - wisp.speed * (1.0 - view.sub_tick);
            let trail_dir = -wisp.speed.signum();
            let radius = cloud_radius * wisp.radius;

            out.push(stroke, |points| {
                for j in 0..WISP_POINTS {
                    let f = j as f32 / (WISP_POINTS - 1) as f32;
                    let angle = head + trail_dir * wisp.arc * f;
                    let r = radius * (1.0 + CURL * (f * PI).sin());
                    points.push(center + Vec2::from_angle(angle) * r);
                }
            });
        }
    }
}
