//! # Math
//!
//! The small set of 2D math the ribbon builder and lifecycle manager need.
//! Everything is `Copy`, `Pod` where it crosses into GPU buffers, and free
//! of allocation.

mod angle;
mod color;
mod scalar;
mod vec2;

pub use angle::{lerp_angle, wrap_angle};
pub use color::Color;
pub use scalar::{bump, inverse_lerp, lerp};
pub use vec2::Vec2;
