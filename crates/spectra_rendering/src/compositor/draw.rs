//! Draw submission seam.
//!
//! The compositor never talks to a device. It hands finished meshes to a
//! [`DrawSink`] owned by the host renderer, which uploads and records them.

use thiserror::Error;

use super::resources::TextureHandle;
use crate::geometry::{RibbonMesh, RibbonVertex};

/// The three layers of a ribbon, in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassKind {
    /// Wide, dim halo.
    Bloom,
    /// The ribbon itself.
    Main,
    /// Thin white-hot center.
    Core,
}

impl PassKind {
    /// All passes in draw order.
    pub const ALL: [Self; 3] = [Self::Bloom, Self::Main, Self::Core];
}

/// What the fragment stage samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    /// Glow texture across the ribbon.
    Textured(TextureHandle),
    /// Analytic falloff, no texture.
    FlatColor,
}

/// One mesh ready for submission.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    /// Which layer this is.
    pub pass: PassKind,
    /// What to sample.
    pub material: Material,
    /// Geometry, borrowed from the builder's scratch buffers.
    pub mesh: RibbonMesh<'a>,
}

/// Why a draw call was not recorded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The bound shader does not expose a parameter the material needs.
    #[error("shader parameter '{0}' is missing")]
    MissingParameter(&'static str),
    /// The GPU buffer could not hold the mesh.
    #[error("mesh of {vertices} vertices does not fit the upload buffer")]
    BufferFull {
        /// Vertices in the rejected mesh.
        vertices: usize,
    },
    /// The device was lost; nothing can be recorded this frame.
    #[error("graphics device lost")]
    DeviceLost,
}

/// Receives finished ribbon meshes.
pub trait DrawSink {
    /// Records one draw call. The mesh borrow ends when this returns.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] if the call could not be recorded. The
    /// compositor skips the pass and carries on.
    fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError>;
}

/// A draw call copied out of the scratch buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
    /// Which layer this was.
    pub pass: PassKind,
    /// What it sampled.
    pub material: Material,
    /// Vertices.
    pub vertices: Vec<RibbonVertex>,
    /// Indices.
    pub indices: Vec<u16>,
}

/// A [`DrawSink`] that keeps copies of everything it receives.
///
/// For tooling and tests. Allocates per call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Draws in submission order.
    pub draws: Vec<RecordedDraw>,
}

impl RecordingSink {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws recorded for `pass`.
    pub fn pass(&self, pass: PassKind) -> impl Iterator<Item = &RecordedDraw> + '_ {
        self.draws.iter().filter(move |d| d.pass == pass)
    }

    /// Forgets everything recorded.
    pub fn clear(&mut self) {
        self.draws.clear();
    }
}

impl DrawSink for RecordingSink {
    fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError> {
        self.draws.push(RecordedDraw {
            pass: call.pass,
            material: call.material,
            vertices: call.mesh.vertices.to_vec(),
            indices: call.mesh.indices.to_vec(),
        });
        Ok(())
    }
}
