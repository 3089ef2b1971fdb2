//! Attack telegraphs: a line that grows out from the attacker during
//! fade-in, pulses while the attack winds up, and fades before it lands.

use rand::Rng;
use spectra_core::math::inverse_lerp;
use spectra_core::Vec2;
use std::f32::consts::TAU;

use super::behavior::{EffectBehavior, RenderView, SpawnContext};
use super::lifecycle::EffectCore;
use super::spawn::EffectKind;
use super::strokes::{StrokeBuffer, StrokeStyle};
use crate::geometry::{ColorProfile, WidthProfile};

/// Points along the line. The line is straight, so it is never smoothed.
const LINE_POINTS: usize = 8;
/// Width swing of the wind-up pulse.
const PULSE_DEPTH: f32 = 0.15;
/// Head and tail width as a fraction of the plateau.
const EDGE_WIDTH: f32 = 0.25;

/// Growing warning line.
#[derive(Clone, Copy, Debug, Default)]
pub struct Telegraph {
    core: EffectCore,
    length: f32,
    pulse_offset: f32,
}

impl Telegraph {
    /// Full reach in world units.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Reach at lifetime `ratio`: grows over fade-in, then holds.
    #[must_use]
    pub fn reach_at(&self, ratio: f32) -> f32 {
        self.length * inverse_lerp(0.0, self.core.envelope.fade_in, ratio)
    }
}

impl EffectBehavior for Telegraph {
    const KIND: EffectKind = EffectKind::Telegraph;

    fn core(&self) -> &EffectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EffectCore {
        &mut self.core
    }

    fn on_spawn(&mut self, ctx: &mut SpawnContext<'_>) {
        let length = ctx.request.length;
        self.length = if length.is_finite() { length.max(0.0) } else { 0.0 };
        self.pulse_offset = ctx.rng.gen_range(0.0..TAU);
    }

    fn emit(&self, view: &RenderView, out: &mut StrokeBuffer) {
        let reach = self.reach_at(view.ratio);
        if reach <= f32::EPSILON {
            return;
        }

        let style = &self.core.style;
        let ticks = self.core.elapsed as f32 - 1.0 + view.sub_tick;
        let pulse = 1.0 + PULSE_DEPTH * (self.pulse_offset + ticks * style.pulse_speed).sin();
        let width = style.base_width * self.core.scale * pulse;

        let stroke = StrokeStyle::themed(
            style,
            WidthProfile::inverse_lerp_bump(width * EDGE_WIDTH, width),
            ColorProfile::gradient(style.palette.accent, style.palette.primary)
                .scaled(view.opacity),
        )
        .with_smoothing(None);

        let origin = view.transform.position;
        let direction = Vec2::from_angle(view.transform.rotation);
        out.push(stroke, |points| {
            // Tip first: the head of the ribbon is the leading edge.
            for j in 0..LINE_POINTS {
                let f = 1.0 - j as f32 / (LINE_POINTS - 1) as f32;
                points.push(origin + direction * (reach * f));
            }
        });
    }
}
