//! # SPECTRA Shared Types
//!
//! Data shared by gameplay (which picks themes and spawns effects) and the
//! renderer (which reads the resolved tuning):
//!
//! - `StyleTable` - `ThemeId -> StyleDescriptor`, resolved once at spawn time
//! - `FxConfig` - pool capacities, mesh budgets, request queue size, RNG seed
//! - `ConfigError` - everything that can go wrong while loading the above
//!
//! ## Design Principles
//!
//! 1. **Data, not branches** - a theme is a row in a table, never a `match`
//! 2. **Fail at startup, never per frame** - loading returns `Result`, lookups
//!    after that fall back to the default theme
//!
//! ## Example
//!
//! ```rust
//! use spectra_shared::{FxConfig, StyleTable};
//!
//! let styles = StyleTable::from_toml_str(r#"
//!     [[theme]]
//!     name = "inferno"
//!     primary = [1.0, 0.35, 0.1, 1.0]
//! "#).unwrap();
//!
//! let inferno = styles.id_of("inferno").unwrap();
//! assert_eq!(styles.resolve(inferno).palette.primary.r, 1.0);
//! assert_eq!(FxConfig::default().ribbon.max_vertices, 2048);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod theme;

pub use config::{FxConfig, PoolCapacities, RibbonLimits};
pub use error::{ConfigError, ConfigResult};
pub use theme::{Palette, PaletteSource, StyleDescriptor, StyleTable, ThemeId};
