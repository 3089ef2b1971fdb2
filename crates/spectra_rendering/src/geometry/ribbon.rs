//! # Ribbon Builder
//!
//! Tessellates a polyline into a triangle strip: two vertices per sample,
//! offset by half the width along the local normal, two triangles per segment.
//!
//! ## Memory
//! The builder owns one set of scratch buffers, sized from [`RibbonLimits`]
//! at construction and overwritten by every build. The returned
//! [`RibbonMesh`] borrows them, so a mesh is only valid until the next build.
//! Builds that would exceed the caps are skipped entirely, never truncated.
//!
//! ## Thread Safety
//! One builder per render thread. The borrow checker enforces that a mesh is
//! consumed before the next build begins.

use bytemuck::{Pod, Zeroable};
use spectra_core::Vec2;
use spectra_shared::RibbonLimits;

use super::polyline::is_valid_point;
use super::profiles::{ColorFn, OffsetFn, PrimitiveSettings, WidthFn};
use super::smoother::resample_into;

/// One ribbon vertex as uploaded to the GPU.
///
/// 32 bytes: position (8) + color (16) + uv (8).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    /// World position.
    pub position: [f32; 2],
    /// Additive color; alpha is always 0.
    pub color: [f32; 4],
    /// `u` = progress along the ribbon, `v` = 0 on the left edge, 1 on the right.
    pub uv: [f32; 2],
}

impl RibbonVertex {
    /// Vertex buffer layout for WGPU
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x4,  // color
        2 => Float32x2,  // uv
    ];

    /// Vertex buffer layout descriptor
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RibbonVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::from(self.position)
    }
}

/// What the last build did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Geometry was written.
    Built {
        /// Samples tessellated.
        samples: usize,
    },
    /// Fewer than two usable points; nothing to draw.
    Degenerate,
    /// The mesh would exceed the vertex or index cap; nothing was written.
    OverCapacity {
        /// Vertices the build would have needed.
        vertices: usize,
        /// Indices the build would have needed.
        indices: usize,
    },
}

/// A mesh borrowed from a [`RibbonBuilder`]'s scratch buffers.
#[derive(Clone, Copy, Debug)]
pub struct RibbonMesh<'a> {
    /// Strip vertices, two per sample.
    pub vertices: &'a [RibbonVertex],
    /// Triangle list, six per segment.
    pub indices: &'a [u16],
    /// Why the mesh looks the way it does.
    pub outcome: BuildOutcome,
}

impl<'a> RibbonMesh<'a> {
    /// True when there is nothing to draw.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex data for a GPU upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices)
    }

    /// Index data for a GPU upload.
    #[must_use]
    pub fn index_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.indices)
    }

    /// Copies the mesh out of the scratch buffers.
    #[must_use]
    pub fn to_owned_mesh(&self) -> OwnedMesh {
        OwnedMesh {
            vertices: self.vertices.to_vec(),
            indices: self.indices.to_vec(),
        }
    }
}

/// A mesh that owns its buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnedMesh {
    /// Strip vertices, two per sample.
    pub vertices: Vec<RibbonVertex>,
    /// Triangle list, six per segment.
    pub indices: Vec<u16>,
}

impl OwnedMesh {
    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Reusable ribbon tessellator.
///
/// # Example
///
/// ```rust
/// use spectra_core::Vec2;
/// use spectra_rendering::geometry::{PrimitiveSettings, RibbonBuilder};
/// use spectra_shared::RibbonLimits;
///
/// let mut builder = RibbonBuilder::new(RibbonLimits::default());
/// let points = [Vec2::new(1.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(9.0, 0.0)];
/// let mesh = builder.build(&points, &PrimitiveSettings::default());
/// assert_eq!(mesh.vertices.len(), 6);
/// assert_eq!(mesh.indices.len(), 12);
/// ```
pub struct RibbonBuilder {
    limits: RibbonLimits,
    /// Input after degenerate-point filtering.
    filtered: Vec<Vec2>,
    /// Catmull-Rom output.
    smoothed: Vec<Vec2>,
    vertices: Vec<RibbonVertex>,
    indices: Vec<u16>,
    stats: BuilderStats,
}

/// Build counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderStats {
    /// Builds that produced geometry.
    pub built: u64,
    /// Builds skipped for lack of usable points.
    pub degenerate: u64,
    /// Builds skipped for exceeding the caps.
    pub over_capacity: u64,
}

impl RibbonBuilder {
    /// Creates a builder with scratch buffers sized for `limits`.
    #[must_use]
    pub fn new(limits: RibbonLimits) -> Self {
        let samples = limits.max_vertices / 2;
        Self {
            limits,
            filtered: Vec::with_capacity(samples),
            smoothed: Vec::with_capacity(samples),
            vertices: Vec::with_capacity(limits.max_vertices),
            indices: Vec::with_capacity(limits.max_indices),
            stats: BuilderStats::default(),
        }
    }

    /// Caps this builder enforces.
    #[must_use]
    pub fn limits(&self) -> RibbonLimits {
        self.limits
    }

    /// Build counters since construction.
    #[must_use]
    pub fn stats(&self) -> BuilderStats {
        self.stats
    }

    /// Builds a ribbon along `polyline` (head first).
    ///
    /// Points that are `(0, 0)` or non-finite are dropped first. With fewer
    /// than two points left, or a result over the caps, the returned mesh is
    /// empty and [`RibbonMesh::outcome`] says why.
    pub fn build<W, C, O>(
        &mut self,
        polyline: &[Vec2],
        settings: &PrimitiveSettings<W, C, O>,
    ) -> RibbonMesh<'_>
    where
        W: WidthFn,
        C: ColorFn,
        O: OffsetFn,
    {
        self.vertices.clear();
        self.indices.clear();

        self.filtered.clear();
        self.filtered
            .extend(polyline.iter().copied().filter(|p| is_valid_point(*p)));

        let outcome = self.tessellate(settings);
        match outcome {
            BuildOutcome::Built { .. } => self.stats.built += 1,
            BuildOutcome::Degenerate => self.stats.degenerate += 1,
            BuildOutcome::OverCapacity { vertices, indices } => {
                self.stats.over_capacity += 1;
                tracing::trace!(vertices, indices, "ribbon over capacity, skipped");
            }
        }

        RibbonMesh {
            vertices: &self.vertices,
            indices: &self.indices,
            outcome,
        }
    }

    fn tessellate<W, C, O>(&mut self, settings: &PrimitiveSettings<W, C, O>) -> BuildOutcome
    where
        W: WidthFn,
        C: ColorFn,
        O: OffsetFn,
    {
        if self.filtered.len() < 2 {
            return BuildOutcome::Degenerate;
        }

        let samples: &[Vec2] = match settings.smoothing {
            Some(count) => {
                resample_into(&self.filtered, count.max(2), &mut self.smoothed);
                &self.smoothed
            }
            None => &self.filtered,
        };

        let vertex_count = samples.len() * 2;
        let index_count = (samples.len() - 1) * 6;
        if vertex_count > self.limits.max_vertices
            || index_count > self.limits.max_indices
            || vertex_count > usize::from(u16::MAX) + 1
        {
            return BuildOutcome::OverCapacity {
                vertices: vertex_count,
                indices: index_count,
            };
        }

        write_strip(samples, settings, &mut self.vertices, &mut self.indices);
        BuildOutcome::Built {
            samples: samples.len(),
        }
    }
}

/// Builds a ribbon into freshly allocated buffers with default limits.
///
/// Convenience for tools and tests; the frame loop uses a [`RibbonBuilder`].
#[must_use]
pub fn build_ribbon<W, C, O>(polyline: &[Vec2], settings: &PrimitiveSettings<W, C, O>) -> OwnedMesh
where
    W: WidthFn,
    C: ColorFn,
    O: OffsetFn,
{
    let mut builder = RibbonBuilder::new(RibbonLimits::default());
    builder.build(polyline, settings).to_owned_mesh()
}

/// Writes two vertices per sample and two triangles per segment.
fn write_strip<W, C, O>(
    samples: &[Vec2],
    settings: &PrimitiveSettings<W, C, O>,
    vertices: &mut Vec<RibbonVertex>,
    indices: &mut Vec<u16>,
) where
    W: WidthFn,
    C: ColorFn,
    O: OffsetFn,
{
    let last = samples.len() - 1;

    // Duplicate samples have no direction; they borrow their neighbour's.
    let mut direction = samples
        .windows(2)
        .map(|w| (w[1] - w[0]).normalize_or_zero())
        .find(|d| *d != Vec2::ZERO)
        .unwrap_or(Vec2::X);

    for (i, &point) in samples.iter().enumerate() {
        let tangent = if i == 0 {
            samples[1] - samples[0]
        } else if i == last {
            samples[last] - samples[last - 1]
        } else {
            samples[i + 1] - samples[i - 1]
        };
        let dir = tangent.normalize_or_zero();
        if dir != Vec2::ZERO {
            direction = dir;
        }

        let progress = i as f32 / last as f32;
        let half = settings.width_at(progress) * 0.5;
        let color = settings.color_at(progress).additive().to_array();
        let center = point + settings.offset_at(progress);
        let normal = direction.perpendicular() * half;

        vertices.push(RibbonVertex {
            position: (center + normal).to_array(),
            color,
            uv: [progress, 0.0],
        });
        vertices.push(RibbonVertex {
            position: (center - normal).to_array(),
            color,
            uv: [progress, 1.0],
        });
    }

    for i in 0..last {
        // Caps guarantee every index fits in u16.
        let base = (i * 2) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }
}
