//! Tests for loading configuration files.

use std::io::Write;
use strictly_2048_play::{ConfigOverrides, GameConfig};
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn test_from_file() {
    let file = config_file("rows = 5\ncols = 6\nwin_score = 144\nsave_path = \"game.json\"\n");
    let config = GameConfig::from_file(file.path()).expect("load");
    assert_eq!(*config.rows(), 5);
    assert_eq!(*config.cols(), 6);
    assert_eq!(*config.win_score(), 144);
    assert_eq!(config.save_path().to_str(), Some("game.json"));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = GameConfig::from_file("/nonexistent/strictly_2048.toml").unwrap_err();
    assert!(err.message.contains("Failed to read"));
}

#[test]
fn test_zero_rows_in_file_rejected() {
    let file = config_file("rows = 0\n");
    assert!(GameConfig::from_file(file.path()).is_err());
}

#[test]
fn test_bad_toml_rejected() {
    let file = config_file("rows = \"four\"\n");
    let err = GameConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse"));
}

#[test]
fn test_cli_overrides_file() {
    let file = config_file("rows = 5\nseed = 1\n");
    let overrides = ConfigOverrides {
        rows: Some(3),
        seed: Some(99),
        ..Default::default()
    };
    let config = GameConfig::resolve(Some(file.path()), overrides).expect("resolve");
    assert_eq!(*config.rows(), 3);
    assert_eq!(*config.seed(), Some(99));
}

#[test]
fn test_resolve_without_file_uses_defaults() {
    let config = GameConfig::resolve(None, ConfigOverrides::default()).expect("resolve");
    assert_eq!(config, GameConfig::default());
}
