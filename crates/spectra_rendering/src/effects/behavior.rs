//! The per-kind hooks the effect manager drives.

use rand_chacha::ChaCha8Rng;
use spectra_core::Transform;
use spectra_shared::FxConfig;

use super::lifecycle::EffectCore;
use super::spawn::{EffectKind, SpawnRequest};
use super::strokes::StrokeBuffer;

/// Upper bound on wisps, sparkles or rays per instance.
pub const MAX_SUB_PARTICLES: usize = 16;

/// Inputs available while a kind initialises a fresh instance.
pub struct SpawnContext<'a> {
    /// The request being served.
    pub request: &'a SpawnRequest,
    /// Global configuration.
    pub config: &'a FxConfig,
    /// Seeded generator for per-instance phase offsets.
    pub rng: &'a mut ChaCha8Rng,
}

/// Inputs available while a kind describes one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderView {
    /// Interpolated (or attached-entity) transform.
    pub transform: Transform,
    /// Shared sub-tick fraction for this frame.
    pub sub_tick: f32,
    /// Interpolated lifetime ratio.
    pub ratio: f32,
    /// Interpolated opacity.
    pub opacity: f32,
}

/// One kind of timed effect.
///
/// Implementors are plain data: `Default` is the reset state a pool slot
/// returns to, and nothing here may allocate.
pub trait EffectBehavior: Default {
    /// Pool this kind lives in.
    const KIND: EffectKind;

    /// Shared lifecycle state.
    fn core(&self) -> &EffectCore;

    /// Shared lifecycle state, mutably.
    fn core_mut(&mut self) -> &mut EffectCore;

    /// Kind-specific setup after the core is initialised.
    fn on_spawn(&mut self, _ctx: &mut SpawnContext<'_>) {}

    /// Kind-specific update after the core has advanced.
    fn on_tick(&mut self) {}

    /// Appends this frame's strokes.
    fn emit(&self, view: &RenderView, out: &mut StrokeBuffer);
}

/// Number of sub-particles a theme asks for, clamped to the inline storage.
#[inline]
pub(crate) fn sub_particle_count(requested: u8) -> usize {
    usize::from(requested).min(MAX_SUB_PARTICLES)
}
