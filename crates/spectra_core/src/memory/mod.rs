//! # Memory Management
//!
//! Pre-allocated pools for short-lived visual entities.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at startup. During gameplay:
//! - No heap allocations
//! - Released instances are reset and reused, never dropped
//! - A full pool evicts its oldest instance instead of refusing a spawn

mod pool;

pub use pool::{Acquired, EffectPool, PoolHandle, PoolStats};
