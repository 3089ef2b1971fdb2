//! # Config File Tests
//!
//! Loads theme and FX config from disk the way a host game does at startup.

use spectra_shared::{ConfigError, FxConfig, PaletteSource, StyleTable};
use std::path::PathBuf;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "spectra_shared_{}_{}",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).expect("temp dir must be writable");
    path
}

/// Test: a boss theme file round-trips into palette lookups.
#[test]
fn test_theme_file_loads() {
    let path = scratch_file(
        "themes.toml",
        r#"
        [[theme]]
        name = "void_warden"
        primary = [0.55, 0.1, 0.9, 1.0]
        secondary = [0.2, 0.0, 0.45, 1.0]
        accent = [0.9, 0.8, 1.0, 1.0]
        base_width = 22.0
        sub_particles = 10
        "#,
    );

    let table = StyleTable::from_toml_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let id = table.id_of("void_warden").unwrap();
    assert_eq!(table.name_of(id), Some("void_warden"));
    assert_eq!(table.resolve(id).base_width, 22.0);
    assert_eq!(table.resolve(id).sub_particles, 10);
    assert_eq!(table.palette(id).secondary.b, 0.45);
}

/// Test: FX config loads from disk and keeps unspecified defaults.
#[test]
fn test_fx_config_file_loads() {
    let path = scratch_file(
        "fx.toml",
        r#"
        request_queue_capacity = 64
        [pools]
        aura = 4
        "#,
    );

    let config = FxConfig::from_toml_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.request_queue_capacity, 64);
    assert_eq!(config.pools.aura, 4);
    assert_eq!(config.trail_points, FxConfig::default().trail_points);
}

/// Test: a missing file is an I/O error, not a panic.
#[test]
fn test_missing_file_reports_io_error() {
    let err = StyleTable::from_toml_file("/definitely/not/here/themes.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("themes.toml"));
}
