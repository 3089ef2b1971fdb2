//! # Configuration Error Types
//!
//! Everything that can fail while loading themes and FX configuration.
//! Nothing past startup returns these.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path that was being read.
        path: String,
        /// OS error message.
        message: String,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A theme entry has out-of-range tuning.
    #[error("invalid theme {theme:?}: {reason}")]
    InvalidStyle {
        /// Name of the offending theme.
        theme: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two themes share a name.
    #[error("duplicate theme name: {0}")]
    DuplicateTheme(String),

    /// More themes than a `ThemeId` can address.
    #[error("too many themes: limit is {limit}")]
    TooManyThemes {
        /// Maximum number of themes.
        limit: usize,
    },

    /// Pool or mesh limits are unusable.
    #[error("invalid limits: {0}")]
    InvalidLimits(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
