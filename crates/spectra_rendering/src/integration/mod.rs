//! # Integration
//!
//! Glue between the effect manager and the rest of the game:
//! - `requests` - spawns and expiries posted from other threads
//! - `fx_renderer` - per-frame collection and multi-pass compositing

mod fx_renderer;
mod requests;

pub use fx_renderer::{FrameContext, FrameStats, FxRenderer};
pub use requests::{EffectRequest, EffectRequestQueue, EffectRequestSender};
