//! # FX Configuration
//!
//! Pool capacities and mesh budgets, loaded once at startup.
//!
//! ```toml
//! seed = 7
//! request_queue_capacity = 512
//!
//! [pools]
//! fog = 128
//! telegraph = 48
//!
//! [ribbon]
//! max_vertices = 2048
//! max_indices = 4096
//! default_segments = 40
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Maximum concurrent instances per effect kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolCapacities {
    /// Atmospheric fog clouds.
    pub fog: usize,
    /// Attack telegraphs.
    pub telegraph: usize,
    /// Boss / buff auras.
    pub aura: usize,
    /// Death spectacles.
    pub death: usize,
    /// Weapon and projectile trails.
    pub trail: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            fog: 96,
            telegraph: 32,
            aura: 16,
            death: 16,
            trail: 128,
        }
    }
}

impl PoolCapacities {
    /// Sum of all pool capacities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.fog + self.telegraph + self.aura + self.death + self.trail
    }
}

/// Mesh budgets for a single ribbon build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RibbonLimits {
    /// Vertex cap per build. Builds over the cap are skipped entirely.
    pub max_vertices: usize,
    /// Index cap per build.
    pub max_indices: usize,
    /// Smoothing sample count used when a theme does not specify one.
    pub default_segments: usize,
}

impl Default for RibbonLimits {
    fn default() -> Self {
        Self {
            max_vertices: 2048,
            max_indices: 4096,
            default_segments: 40,
        }
    }
}

/// Top-level FX configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FxConfig {
    /// Pool capacities.
    pub pools: PoolCapacities,
    /// Ribbon mesh budgets.
    pub ribbon: RibbonLimits,
    /// Anchor points kept per trail.
    pub trail_points: usize,
    /// Cross-thread spawn requests buffered between ticks.
    pub request_queue_capacity: usize,
    /// Seed for per-instance phase offsets.
    pub seed: u64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            pools: PoolCapacities::default(),
            ribbon: RibbonLimits::default(),
            trail_points: 32,
            request_queue_capacity: 256,
            seed: 0x5EC7_4A11,
        }
    }
}

impl FxConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unusable limits.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`FxConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that the limits can produce at least one ribbon segment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLimits` describing the problem.
    pub fn validate(&self) -> ConfigResult<()> {
        let ribbon = &self.ribbon;
        if ribbon.max_vertices < 4 || ribbon.max_indices < 6 {
            return Err(ConfigError::InvalidLimits(
                "ribbon caps must allow at least one segment (4 vertices, 6 indices)".to_string(),
            ));
        }
        // Indices are u16 on the GPU side.
        if ribbon.max_vertices > usize::from(u16::MAX) + 1 {
            return Err(ConfigError::InvalidLimits(format!(
                "max_vertices {} exceeds the 16-bit index range",
                ribbon.max_vertices
            )));
        }
        if ribbon.default_segments < 2 {
            return Err(ConfigError::InvalidLimits(
                "default_segments must be at least 2".to_string(),
            ));
        }
        if self.trail_points < 2 {
            return Err(ConfigError::InvalidLimits(
                "trail_points must be at least 2".to_string(),
            ));
        }
        if self.request_queue_capacity == 0 {
            return Err(ConfigError::InvalidLimits(
                "request_queue_capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
