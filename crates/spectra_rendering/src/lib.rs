//! # SPECTRA Rendering
//!
//! Glowing ribbon effects for a 2D action game:
//! - Ribbon geometry from polylines with per-point width and color
//! - Three-pass additive compositing (bloom, main, core)
//! - Pooled, lifecycle-driven effects (fog, telegraphs, auras, deaths, trails)
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      FRAME PIPELINE                           │
//! ├───────────────────────────────────────────────────────────────┤
//! │  Requests → EffectManager::tick → collect_strokes             │
//! │                                        ↓                      │
//! │     resample → RibbonBuilder → MultiPassCompositor → DrawSink │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - No allocations per frame once buffers have warmed up
//! - A skipped ribbon beats a stalled frame: builds over capacity are dropped
//! - GPU resources are created on the render thread only

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod compositor;
pub mod effects;
pub mod geometry;
pub mod integration;

pub use compositor::{
    DrawCall, DrawSink, GlowTextureCache, Material, MultiPassCompositor, PassKind, SubmitError,
    TextureProvider,
};
pub use effects::{EffectHandle, EffectKind, EffectManager, SpawnRequest, TrailStyle};
pub use geometry::{
    build_ribbon, resample, ColorProfile, PrimitiveSettings, RibbonBuilder, RibbonMesh,
    RibbonVertex, WidthProfile,
};
pub use integration::{EffectRequest, EffectRequestQueue, FrameContext, FxRenderer};
