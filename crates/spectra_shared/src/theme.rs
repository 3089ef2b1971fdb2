//! # Theme Table
//!
//! Every boss, weapon and biome picks a theme. A theme is one row of numbers:
//! three palette colors plus the tuning the compositor and lifecycle manager
//! need. The row is copied onto the effect instance at spawn, so nothing
//! re-branches on theme identity per tick.
//!
//! Slot 0 is always the built-in `"default"` theme; unknown ids resolve to it.

use serde::Deserialize;
use spectra_core::Color;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Maximum number of themes in one table.
pub const MAX_THEMES: usize = u16::MAX as usize;

/// Index of a theme in a [`StyleTable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeId(pub u16);

impl ThemeId {
    /// The built-in default theme.
    pub const DEFAULT: Self = Self(0);
}

/// The three colors every effect composes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Dominant color (main pass, fog body, telegraph fill).
    pub primary: Color,
    /// Gradient partner of `primary` (trail tails, ray ends).
    pub secondary: Color,
    /// Highlight color (sparkles, death flashes).
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::rgb(0.55, 0.75, 1.0),
            secondary: Color::rgb(0.25, 0.35, 0.9),
            accent: Color::rgb(1.0, 1.0, 1.0),
        }
    }
}

/// Fully resolved visual tuning for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleDescriptor {
    /// Colors.
    pub palette: Palette,
    /// Base ribbon width in world units.
    pub base_width: f32,
    /// Bloom pass width multiplier (typically 2.0-3.2).
    pub bloom_multiplier: f32,
    /// Core pass width multiplier (typically 0.35-0.45).
    pub core_multiplier: f32,
    /// Lifetime ratio at which fade-in ends.
    pub fade_in: f32,
    /// Lifetime ratio at which fade-out starts.
    pub fade_out: f32,
    /// Opacity held during sustain.
    pub target_opacity: f32,
    /// Per-tick velocity multiplier for drifting effects.
    pub velocity_damping: f32,
    /// Catmull-Rom output samples per ribbon (0 disables smoothing).
    pub smoothing_segments: u16,
    /// Wisps / sparkles / rays per instance.
    pub sub_particles: u8,
    /// Sub-particle phase advance per tick, in radians.
    pub pulse_speed: f32,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            base_width: 16.0,
            bloom_multiplier: 2.5,
            core_multiplier: 0.4,
            fade_in: 0.2,
            fade_out: 0.7,
            target_opacity: 1.0,
            velocity_damping: 0.95,
            smoothing_segments: 40,
            sub_particles: 6,
            pulse_speed: 0.12,
        }
    }
}

impl StyleDescriptor {
    /// Checks that every tuning value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStyle` naming the first bad field.
    pub fn validate(&self, theme: &str) -> ConfigResult<()> {
        let invalid = |reason: &str| ConfigError::InvalidStyle {
            theme: theme.to_string(),
            reason: reason.to_string(),
        };

        if !(self.base_width.is_finite() && self.base_width > 0.0) {
            return Err(invalid("base_width must be positive"));
        }
        if !(self.bloom_multiplier.is_finite() && self.bloom_multiplier > 0.0) {
            return Err(invalid("bloom_multiplier must be positive"));
        }
        if !(self.core_multiplier.is_finite() && self.core_multiplier > 0.0) {
            return Err(invalid("core_multiplier must be positive"));
        }
        if !(0.0..=1.0).contains(&self.fade_in) || !(0.0..=1.0).contains(&self.fade_out) {
            return Err(invalid("fade thresholds must lie in [0, 1]"));
        }
        if self.fade_in > self.fade_out {
            return Err(invalid("fade_in must not exceed fade_out"));
        }
        if !(0.0..=1.0).contains(&self.target_opacity) {
            return Err(invalid("target_opacity must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.velocity_damping) {
            return Err(invalid("velocity_damping must lie in [0, 1]"));
        }
        if self.smoothing_segments == 1 {
            return Err(invalid("smoothing_segments must be 0 or at least 2"));
        }
        if !self.pulse_speed.is_finite() {
            return Err(invalid("pulse_speed must be finite"));
        }
        let colors = [
            self.palette.primary,
            self.palette.secondary,
            self.palette.accent,
        ];
        if colors.iter().any(|c| !c.is_finite()) {
            return Err(invalid("palette colors must be finite"));
        }
        Ok(())
    }
}

/// Host-facing palette lookup.
pub trait PaletteSource {
    /// Palette for `theme`. Unknown themes yield the default palette.
    fn palette(&self, theme: ThemeId) -> Palette;
}

/// On-disk shape of a theme row. Every tuning field is optional.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeEntry {
    name: String,
    primary: [f32; 4],
    secondary: Option<[f32; 4]>,
    accent: Option<[f32; 4]>,
    base_width: f32,
    bloom_multiplier: f32,
    core_multiplier: f32,
    fade_in: f32,
    fade_out: f32,
    target_opacity: f32,
    velocity_damping: f32,
    smoothing_segments: u16,
    sub_particles: u8,
    pulse_speed: f32,
}

impl Default for ThemeEntry {
    fn default() -> Self {
        let base = StyleDescriptor::default();
        Self {
            name: String::new(),
            primary: base.palette.primary.to_array(),
            secondary: None,
            accent: None,
            base_width: base.base_width,
            bloom_multiplier: base.bloom_multiplier,
            core_multiplier: base.core_multiplier,
            fade_in: base.fade_in,
            fade_out: base.fade_out,
            target_opacity: base.target_opacity,
            velocity_damping: base.velocity_damping,
            smoothing_segments: base.smoothing_segments,
            sub_particles: base.sub_particles,
            pulse_speed: base.pulse_speed,
        }
    }
}

impl ThemeEntry {
    fn into_descriptor(self) -> (String, StyleDescriptor) {
        let primary = Color::from_array(self.primary);
        // Missing gradient partners derive from primary.
        let secondary = self
            .secondary
            .map_or(primary * 0.6, Color::from_array)
            .with_alpha(primary.a);
        let accent = self.accent.map_or(Color::WHITE, Color::from_array);
        let descriptor = StyleDescriptor {
            palette: Palette {
                primary,
                secondary,
                accent,
            },
            base_width: self.base_width,
            bloom_multiplier: self.bloom_multiplier,
            core_multiplier: self.core_multiplier,
            fade_in: self.fade_in,
            fade_out: self.fade_out,
            target_opacity: self.target_opacity,
            velocity_damping: self.velocity_damping,
            smoothing_segments: self.smoothing_segments,
            sub_particles: self.sub_particles,
            pulse_speed: self.pulse_speed,
        };
        (self.name, descriptor)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeFile {
    #[serde(default)]
    theme: Vec<ThemeEntry>,
}

/// `ThemeId -> StyleDescriptor` table.
#[derive(Clone, Debug)]
pub struct StyleTable {
    names: Vec<String>,
    styles: Vec<StyleDescriptor>,
}

impl StyleTable {
    /// Name of the built-in theme in slot 0.
    pub const DEFAULT_NAME: &'static str = "default";

    /// Table holding only the default theme.
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: vec![Self::DEFAULT_NAME.to_string()],
            styles: vec![StyleDescriptor::default()],
        }
    }

    /// Parses a TOML document of `[[theme]]` rows.
    ///
    /// A row named `"default"` replaces the built-in default theme.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, invalid tuning or duplicate names.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let file: ThemeFile = toml::from_str(source)?;
        let mut table = Self::new();
        let mut default_replaced = false;

        for entry in file.theme {
            let (name, style) = entry.into_descriptor();
            if name.is_empty() {
                return Err(ConfigError::InvalidStyle {
                    theme: name,
                    reason: "theme name must not be empty".to_string(),
                });
            }
            if name == Self::DEFAULT_NAME && !default_replaced {
                style.validate(&name)?;
                table.styles[0] = style;
                default_replaced = true;
                continue;
            }
            table.insert(&name, style)?;
        }

        tracing::info!("loaded {} themes", table.len());
        Ok(table)
    }

    /// Reads and parses a theme file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`StyleTable::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Adds a theme and returns its id.
    ///
    /// # Errors
    ///
    /// Fails on invalid tuning, a duplicate name, or a full table.
    pub fn insert(&mut self, name: &str, style: StyleDescriptor) -> ConfigResult<ThemeId> {
        style.validate(name)?;
        if self.id_of(name).is_some() {
            return Err(ConfigError::DuplicateTheme(name.to_string()));
        }
        if self.styles.len() >= MAX_THEMES {
            return Err(ConfigError::TooManyThemes { limit: MAX_THEMES });
        }
        let id = ThemeId(self.styles.len() as u16);
        self.names.push(name.to_string());
        self.styles.push(style);
        Ok(id)
    }

    /// Looks up a theme id by name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ThemeId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| ThemeId(index as u16))
    }

    /// Name of a theme.
    #[must_use]
    pub fn name_of(&self, theme: ThemeId) -> Option<&str> {
        self.names.get(usize::from(theme.0)).map(String::as_str)
    }

    /// Tuning for `theme`; unknown ids fall back to the default theme.
    #[inline]
    #[must_use]
    pub fn resolve(&self, theme: ThemeId) -> &StyleDescriptor {
        self.styles
            .get(usize::from(theme.0))
            .unwrap_or(&self.styles[0])
    }

    /// Returns true if `theme` is a real row (not a fallback).
    #[must_use]
    pub fn contains(&self, theme: ThemeId) -> bool {
        usize::from(theme.0) < self.styles.len()
    }

    /// Number of themes, including the default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Always false: the default theme is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteSource for StyleTable {
    fn palette(&self, theme: ThemeId) -> Palette {
        self.resolve(theme).palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEMES: &str = r#"
        [[theme]]
        name = "inferno"
        primary = [1.0, 0.35, 0.1, 1.0]
        secondary = [0.7, 0.05, 0.0, 1.0]
        accent = [1.0, 0.9, 0.4, 1.0]
        bloom_multiplier = 3.2
        core_multiplier = 0.35

        [[theme]]
        name = "frost"
        primary = [0.4, 0.8, 1.0, 1.0]
        fade_in = 0.15
        fade_out = 0.8
    "#;

    #[test]
    fn test_parse_themes() {
        let table = StyleTable::from_toml_str(THEMES).unwrap();
        assert_eq!(table.len(), 3);

        let inferno = table.resolve(table.id_of("inferno").unwrap());
        assert_eq!(inferno.bloom_multiplier, 3.2);
        assert_eq!(inferno.palette.accent, Color::new(1.0, 0.9, 0.4, 1.0));

        let frost = table.resolve(table.id_of("frost").unwrap());
        assert_eq!(frost.fade_in, 0.15);
        // Unspecified tuning inherits defaults.
        assert_eq!(frost.core_multiplier, StyleDescriptor::default().core_multiplier);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let table = StyleTable::from_toml_str(THEMES).unwrap();
        let fallback = table.resolve(ThemeId(999));
        assert_eq!(fallback, table.resolve(ThemeId::DEFAULT));
        assert!(!table.contains(ThemeId(999)));
    }

    #[test]
    fn test_default_row_replaces_builtin() {
        let table = StyleTable::from_toml_str(
            r#"
            [[theme]]
            name = "default"
            primary = [0.0, 1.0, 0.0, 1.0]
        "#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.palette(ThemeId::DEFAULT).primary, Color::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rejects_inverted_fades() {
        let err = StyleTable::from_toml_str(
            r#"
            [[theme]]
            name = "broken"
            fade_in = 0.9
            fade_out = 0.1
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStyle { .. }));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = StyleTable::from_toml_str(
            r#"
            [[theme]]
            name = "a"
            [[theme]]
            name = "a"
        "#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateTheme("a".to_string()));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = StyleTable::from_toml_str(
            r#"
            [[theme]]
            name = "a"
            glow = 3.0
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
