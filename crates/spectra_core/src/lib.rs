//! # SPECTRA Core
//!
//! Allocation-free building blocks for the SPECTRA visual effects stack:
//! - 2D math (`Vec2`, `Color`, shortest-path angles, scalar ramps)
//! - Fixed-capacity effect pools with oldest-first eviction
//! - Sub-tick transform interpolation
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations after construction** - pools reserve everything up front
//! 2. **Never panic in steady state** - a dropped effect beats a dropped frame
//! 3. **Single-threaded ownership** - the effect manager owns every pool
//!
//! ## Example
//!
//! ```rust
//! use spectra_core::{EffectPool, Vec2};
//!
//! let mut pool: EffectPool<Vec2> = EffectPool::new(3);
//! let handle = pool.acquire(0, |p| *p = Vec2::new(1.0, 2.0)).handle;
//! assert_eq!(pool.get(handle), Some(&Vec2::new(1.0, 2.0)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod interpolation;
pub mod math;
pub mod memory;

pub use interpolation::{sample, EntityId, Transform, TransformHistory, TransformSource};
pub use math::{Color, Vec2};
pub use memory::{Acquired, EffectPool, PoolHandle, PoolStats};
