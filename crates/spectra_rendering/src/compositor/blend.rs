//! Ribbon Pipeline State
//!
//! Every ribbon pass draws with **ADDITIVE BLENDING** (ONE + ONE):
//! - No sorting required (A + B = B + A), so effects draw in any order
//! - Overlapping passes stack into glow instead of occluding each other
//! - Vertex alpha is always 0; transparency is baked into RGB
//!
//! ```text
//! color_blend:  src ONE, dst ONE, op ADD
//! alpha_blend:  src ONE, dst ONE, op ADD
//! ```

use crate::geometry::RibbonVertex;

/// `ONE + ONE` for both color and alpha.
pub const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// WGSL source for the ribbon pipeline.
///
/// Entry points: `vs_main`, `fs_glow` (textured), `fs_flat` (no texture).
pub const RIBBON_SHADER: &str = include_str!("../../shaders/ribbon.wgsl");

/// Fragment entry point for the textured glow path.
pub const FS_GLOW_ENTRY: &str = "fs_glow";

/// Fragment entry point for the flat-color fallback path.
pub const FS_FLAT_ENTRY: &str = "fs_flat";

/// Color target for a ribbon pipeline rendering into `format`.
#[must_use]
pub fn color_target(format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format,
        blend: Some(ADDITIVE_BLEND),
        write_mask: wgpu::ColorWrites::ALL,
    }
}

/// Vertex buffer layouts for a ribbon pipeline.
#[must_use]
pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 1] {
    [RibbonVertex::desc()]
}

/// Primitive state: indexed triangle list, no culling.
///
/// Ribbons flip winding wherever the path turns back on itself, so
/// back-face culling would punch holes in them.
#[must_use]
pub fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        unclipped_depth: false,
        polygon_mode: wgpu::PolygonMode::Fill,
        conservative: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_is_one_plus_one() {
        let target = color_target(wgpu::TextureFormat::Rgba16Float);
        let blend = target.blend.unwrap();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);
        assert_eq!(blend.alpha, blend.color);
    }

    #[test]
    fn test_shader_exposes_entry_points() {
        assert!(RIBBON_SHADER.contains("fn vs_main"));
        assert!(RIBBON_SHADER.contains(&format!("fn {FS_GLOW_ENTRY}")));
        assert!(RIBBON_SHADER.contains(&format!("fn {FS_FLAT_ENTRY}")));
    }

    #[test]
    fn test_no_culling() {
        assert!(primitive_state().cull_mode.is_none());
        assert_eq!(vertex_layouts()[0].array_stride, 32);
    }
}
