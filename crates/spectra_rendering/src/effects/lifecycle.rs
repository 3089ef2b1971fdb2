//! # Timed Effect Lifecycle
//!
//! Every effect instance runs the same phase machine:
//!
//! ```text
//! Spawned ──► FadeIn ──► Sustain ──► FadeOut ──► Released
//!            (ratio < fade_in)   (ratio >= fade_out)   (elapsed >= max)
//! ```
//!
//! Phases only move forward. Opacity ramps linearly up to the target during
//! fade-in, holds during sustain, and ramps back to zero during fade-out.

use spectra_core::math::inverse_lerp;
use spectra_core::{EntityId, Transform, TransformHistory, Vec2};
use spectra_shared::{StyleDescriptor, ThemeId};

use super::spawn::SpawnRequest;

/// Lifecycle phase. Ordering follows the lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Allocated, not yet ticked.
    #[default]
    Spawned,
    /// Opacity ramping up.
    FadeIn,
    /// Opacity at target.
    Sustain,
    /// Opacity ramping down.
    FadeOut,
    /// Done; the slot is returned to the pool.
    Released,
}

/// Fade thresholds as fractions of the lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifecycleEnvelope {
    /// Ratio at which fade-in ends.
    pub fade_in: f32,
    /// Ratio at which fade-out starts.
    pub fade_out: f32,
    /// Opacity held during sustain.
    pub target_opacity: f32,
}

impl Default for LifecycleEnvelope {
    fn default() -> Self {
        Self::from_style(&StyleDescriptor::default())
    }
}

impl LifecycleEnvelope {
    /// Envelope taken from a theme.
    #[must_use]
    pub fn from_style(style: &StyleDescriptor) -> Self {
        Self {
            fade_in: style.fade_in,
            fade_out: style.fade_out,
            target_opacity: style.target_opacity,
        }
    }

    /// Phase at lifetime `ratio`.
    #[must_use]
    pub fn phase(&self, ratio: f32) -> Phase {
        if ratio >= 1.0 {
            Phase::Released
        } else if ratio >= self.fade_out {
            Phase::FadeOut
        } else if ratio >= self.fade_in {
            Phase::Sustain
        } else {
            Phase::FadeIn
        }
    }

    /// Opacity at lifetime `ratio`.
    #[must_use]
    pub fn opacity(&self, ratio: f32) -> f32 {
        let target = self.target_opacity;
        match self.phase(ratio) {
            Phase::Spawned | Phase::FadeIn => target * inverse_lerp(0.0, self.fade_in, ratio),
            Phase::Sustain => target,
            Phase::FadeOut => target * (1.0 - inverse_lerp(self.fade_out, 1.0, ratio)),
            Phase::Released => 0.0,
        }
    }
}

/// State shared by every effect kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectCore {
    /// Last two simulated transforms.
    pub transform: TransformHistory,
    /// World units per tick.
    pub velocity: Vec2,
    /// Per-tick velocity multiplier (1.0 = no damping).
    pub damping: f32,
    /// Ticks lived.
    pub elapsed: u32,
    /// Ticks until release.
    pub max_lifetime: u32,
    /// Size multiplier.
    pub scale: f32,
    /// Opacity after the last tick.
    pub opacity: f32,
    /// Current phase.
    pub phase: Phase,
    /// Fade thresholds.
    pub envelope: LifecycleEnvelope,
    /// Theme tuning copied at spawn.
    pub style: StyleDescriptor,
    /// Theme the tuning came from.
    pub theme: ThemeId,
    /// Entity this effect follows, if any.
    pub attach: Option<EntityId>,
    /// Transform recorded by the host for the next tick, replacing the
    /// velocity step.
    pub staged: Option<Transform>,
}

impl EffectCore {
    /// Fresh core for `request`, already in its first visible phase.
    #[must_use]
    pub fn spawn(request: &SpawnRequest, style: &StyleDescriptor) -> Self {
        let envelope = LifecycleEnvelope::from_style(style);
        let scale = if request.scale.is_finite() && request.scale > 0.0 {
            request.scale
        } else {
            1.0
        };
        let mut core = Self {
            transform: TransformHistory::new(Transform::new(request.position, request.rotation)),
            velocity: request.velocity,
            damping: 1.0,
            elapsed: 0,
            max_lifetime: request.max_lifetime.max(1),
            scale,
            opacity: envelope.opacity(0.0),
            phase: Phase::Spawned,
            envelope,
            style: *style,
            theme: request.theme,
            attach: request.attach,
            staged: None,
        };
        core.enter(Phase::FadeIn.max(envelope.phase(0.0)));
        core
    }

    /// `elapsed / max_lifetime`, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn lifetime_ratio(&self) -> f32 {
        if self.max_lifetime == 0 {
            return 1.0;
        }
        (self.elapsed as f32 / self.max_lifetime as f32).clamp(0.0, 1.0)
    }

    /// Lifetime ratio between the last two ticks, for rendering.
    #[inline]
    #[must_use]
    pub fn visual_ratio(&self, sub_tick: f32) -> f32 {
        if self.max_lifetime == 0 {
            return 1.0;
        }
        let sub_tick = if sub_tick.is_finite() {
            sub_tick.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let ticks = (self.elapsed as f32 - 1.0 + sub_tick).max(0.0);
        (ticks / self.max_lifetime as f32).clamp(0.0, 1.0)
    }

    /// Opacity between the last two ticks, for rendering.
    #[inline]
    #[must_use]
    pub fn visual_opacity(&self, sub_tick: f32) -> f32 {
        if self.phase == Phase::Released {
            return 0.0;
        }
        self.envelope.opacity(self.visual_ratio(sub_tick))
    }

    /// Runs one simulation tick. Returns false once the effect is released.
    pub fn advance(&mut self) -> bool {
        if self.phase == Phase::Released {
            return false;
        }
        if self.elapsed >= self.max_lifetime {
            self.release();
            return false;
        }

        let next = self.staged.take().unwrap_or_else(|| {
            let current = self.transform.current();
            Transform::new(current.position + self.velocity, current.rotation)
        });
        self.transform.push(next);
        self.velocity *= self.damping;

        self.elapsed += 1;
        let ratio = self.lifetime_ratio();
        self.enter(self.envelope.phase(ratio));
        if self.phase == Phase::Released {
            self.opacity = 0.0;
            return false;
        }
        self.opacity = self.envelope.opacity(ratio);
        true
    }

    /// Sets where the next tick moves to. The last call before a tick wins.
    pub fn stage(&mut self, transform: Transform) {
        self.staged = Some(transform);
    }

    /// Jumps to the end of the lifetime. The next tick releases.
    pub fn force_expire(&mut self) {
        self.elapsed = self.max_lifetime;
    }

    /// True once released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.phase == Phase::Released
    }

    fn release(&mut self) {
        self.enter(Phase::Released);
        self.opacity = 0.0;
    }

    /// Moves to `next` unless that would go backwards.
    fn enter(&mut self, next: Phase) {
        if next > self.phase {
            self.phase = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    fn core(max: u32) -> EffectCore {
        let request = SpawnRequest::new(EffectKind::Fog, Vec2::new(1.0, 1.0)).with_lifetime(max);
        EffectCore::spawn(&request, &StyleDescriptor::default())
    }

    #[test]
    fn test_spawn_enters_fade_in() {
        let core = core(100);
        assert_eq!(core.phase, Phase::FadeIn);
        assert_eq!(core.opacity, 0.0);
    }

    #[test]
    fn test_envelope_phases() {
        let env = LifecycleEnvelope::default();
        assert_eq!(env.phase(0.1), Phase::FadeIn);
        assert_eq!(env.phase(0.2), Phase::Sustain);
        assert_eq!(env.phase(0.69), Phase::Sustain);
        assert_eq!(env.phase(0.7), Phase::FadeOut);
        assert_eq!(env.phase(1.0), Phase::Released);
    }

    #[test]
    fn test_zero_fade_in_starts_sustained() {
        let style = StyleDescriptor {
            fade_in: 0.0,
            ..StyleDescriptor::default()
        };
        let request = SpawnRequest::new(EffectKind::Aura, Vec2::new(1.0, 1.0));
        let core = EffectCore::spawn(&request, &style);
        assert_eq!(core.phase, Phase::Sustain);
        assert_eq!(core.opacity, 1.0);
    }

    #[test]
    fn test_velocity_damping() {
        let mut core = core(100);
        core.velocity = Vec2::new(10.0, 0.0);
        core.damping = 0.95;
        core.advance();
        assert_eq!(core.transform.current().position, Vec2::new(11.0, 1.0));
        assert!((core.velocity.x - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_staged_transform_replaces_velocity_step() {
        let mut core = core(100);
        core.velocity = Vec2::new(10.0, 0.0);
        core.stage(Transform::at(Vec2::new(4.0, 2.0)));
        core.advance();
        assert_eq!(core.transform.previous().map(|t| t.position), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(core.transform.current().position, Vec2::new(4.0, 2.0));

        // Consumed: the next tick falls back to velocity.
        core.advance();
        assert_eq!(core.transform.current().position.y, 2.0);
        assert!(core.transform.current().position.x > 4.0);
    }

    #[test]
    fn test_force_expire_releases_next_tick() {
        let mut core = core(100);
        core.advance();
        core.force_expire();
        assert_eq!(core.elapsed, 100);
        assert!(!core.is_released());
        assert!(!core.advance());
        assert!(core.is_released());
        assert_eq!(core.opacity, 0.0);
    }

    #[test]
    fn test_visual_ratio_trails_by_one_tick() {
        let mut core = core(10);
        for _ in 0..4 {
            core.advance();
        }
        assert!((core.visual_ratio(0.0) - 0.3).abs() < 1e-6);
        assert!((core.visual_ratio(1.0) - 0.4).abs() < 1e-6);
    }
}
