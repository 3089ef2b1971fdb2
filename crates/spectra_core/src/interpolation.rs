//! # Sub-Tick Interpolation
//!
//! The simulation runs at a fixed tick; the renderer runs at whatever rate the
//! display allows. Every visual sample is taken between the last two simulation
//! snapshots using one sub-tick fraction per render frame.
//!
//! ## Rules
//! - One `sub_tick` per frame, shared by every effect (no desync between
//!   effects drawn in the same frame)
//! - Rotation takes the shortest arc
//! - No previous snapshot means "render the current one" - never extrapolate
//!
//! ## Usage
//! ```rust
//! use spectra_core::{Transform, TransformHistory, Vec2};
//!
//! let mut history = TransformHistory::new(Transform::at(Vec2::ZERO));
//! history.push(Transform::at(Vec2::new(10.0, 0.0)));
//!
//! let visual = history.sample(0.5);
//! assert_eq!(visual.position, Vec2::new(5.0, 0.0));
//! ```

use crate::math::{lerp_angle, Vec2};

/// Identifier of a host-game entity an effect can follow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// A position plus facing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// World position.
    pub position: Vec2,
    /// Facing in radians.
    pub rotation: f32,
}

impl Transform {
    /// Creates a transform.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Transform at `position` with zero rotation.
    #[inline]
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }
}

/// Samples between two simulation snapshots.
///
/// `sub_tick` is clamped to `[0, 1]`. Without a previous snapshot the current
/// one is returned unchanged.
#[inline]
#[must_use]
pub fn sample(previous: Option<Transform>, current: Transform, sub_tick: f32) -> Transform {
    let Some(previous) = previous else {
        return current;
    };
    let t = if sub_tick.is_finite() {
        sub_tick.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Transform {
        position: previous.position.lerp(current.position, t),
        rotation: lerp_angle(previous.rotation, current.rotation, t),
    }
}

/// The last two simulation snapshots of something that moves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformHistory {
    previous: Option<Transform>,
    current: Transform,
}

impl TransformHistory {
    /// Starts a history with no previous snapshot.
    #[must_use]
    pub const fn new(current: Transform) -> Self {
        Self {
            previous: None,
            current,
        }
    }

    /// Records the snapshot for a new simulation tick.
    pub fn push(&mut self, next: Transform) {
        self.previous = Some(self.current);
        self.current = next;
    }

    /// Jumps to `transform` without interpolating from the old position.
    pub fn teleport(&mut self, transform: Transform) {
        self.previous = None;
        self.current = transform;
    }

    /// Latest simulation snapshot.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Transform {
        self.current
    }

    /// Previous simulation snapshot, if one exists.
    #[inline]
    #[must_use]
    pub const fn previous(&self) -> Option<Transform> {
        self.previous
    }

    /// Interpolated transform for this render frame.
    #[inline]
    #[must_use]
    pub fn sample(&self, sub_tick: f32) -> Transform {
        sample(self.previous, self.current, sub_tick)
    }
}

/// Host-side supplier of interpolated entity transforms.
///
/// Implemented by the game's entity system. The returned transform must
/// already be interpolated with the current frame's sub-tick; `None` means
/// the entity is gone and attached effects should stay where they are.
pub trait TransformSource {
    /// Interpolated transform of `entity` for the current frame.
    fn interpolated_transform(&self, entity: EntityId) -> Option<Transform>;
}

impl<F> TransformSource for F
where
    F: Fn(EntityId) -> Option<Transform>,
{
    fn interpolated_transform(&self, entity: EntityId) -> Option<Transform> {
        self(entity)
    }
}
