//! # Ribbon Compositor
//!
//! Turns polylines into layered, additive draw calls:
//! - `multi_pass` - bloom / main / core passes over one shared builder
//! - `draw` - the [`DrawSink`] seam to the host renderer
//! - `resources` - the lazily created glow texture
//! - `blend` - WGPU pipeline descriptors and the ribbon shader

mod blend;
mod draw;
mod multi_pass;
mod resources;

pub use blend::{
    color_target, primitive_state, vertex_layouts, ADDITIVE_BLEND, FS_FLAT_ENTRY, FS_GLOW_ENTRY,
    RIBBON_SHADER,
};
pub use draw::{DrawCall, DrawSink, Material, PassKind, RecordedDraw, RecordingSink, SubmitError};
pub use multi_pass::{
    CompositeOutcome, CompositeParams, CompositorStats, MultiPassCompositor, BLOOM_INTENSITY,
    CORE_INTENSITY,
};
pub use resources::{GlowTextureCache, TextureHandle, TextureProvider};
