//! # Timed Effects
//!
//! Pooled, lifecycle-driven visual effects:
//! - `lifecycle` - phases, fade envelope, shared per-instance state
//! - `manager` - pools per kind, spawn / tick / force-expire
//! - `fog`, `telegraph`, `aura`, `death`, `trail` - the effect kinds
//! - `strokes` - what effects hand to the compositor each frame
//!
//! ## Lifecycle
//!
//! ```text
//! spawn ──► FadeIn ──► Sustain ──► FadeOut ──► Released ──► slot reused
//!                                                 ▲
//!                    force_expire ────────────────┘ (on the next tick)
//! ```

mod aura;
mod behavior;
mod death;
mod fog;
mod lifecycle;
mod manager;
mod spawn;
mod strokes;
mod telegraph;
mod trail;

pub use aura::Aura;
pub use behavior::{EffectBehavior, RenderView, SpawnContext, MAX_SUB_PARTICLES};
pub use death::DeathSpectacle;
pub use fog::FogCloud;
pub use lifecycle::{EffectCore, LifecycleEnvelope, Phase};
pub use manager::{EffectManager, EffectSnapshot, ManagerStats, TickReport};
pub use spawn::{EffectHandle, EffectKind, SpawnRequest, TrailStyle};
pub use strokes::{StrokeBuffer, StrokeStyle};
pub use telegraph::Telegraph;
pub use trail::Trail;
