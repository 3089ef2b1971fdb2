//! # Ribbon Geometry
//!
//! Pure geometry, no GPU state:
//! - `profiles` - width/color functions of trail progress and the named presets
//! - `smoother` - Catmull-Rom resampling of sparse polylines
//! - `polyline` - anchor points, trail history, degenerate-point filtering
//! - `ribbon` - triangle-strip tessellation into a shared scratch buffer
//!
//! Progress is head-relative everywhere: `0.0` is the most recent point,
//! `1.0` the oldest.

mod polyline;
mod profiles;
mod ribbon;
mod smoother;

pub use polyline::{is_valid_point, AnchorPoint, TrailHistory, MAX_TRAIL_POINTS};
pub use profiles::{
    ColorFn, ColorProfile, OffsetFn, PrimitiveSettings, WidthFn, WidthProfile, DEFAULT_WIDTH,
};
pub use ribbon::{
    build_ribbon, BuildOutcome, BuilderStats, OwnedMesh, RibbonBuilder, RibbonMesh, RibbonVertex,
};
pub use smoother::{resample, resample_into};
