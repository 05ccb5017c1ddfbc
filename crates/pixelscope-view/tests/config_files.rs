//! Config persistence through real files.

use pixelscope_view::{ConfigError, ViewerConfig, ZoomLimits};
use tempfile::tempdir;

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.ron");

    let config = ViewerConfig {
        zoom: ZoomLimits::new(0.25, 8.0),
        diff_offset: 64,
        gain_log2_range: (-3, 6),
        verbose: 2,
    };
    config.save(&path).unwrap();
    assert!(path.exists());

    let loaded = ViewerConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_hand_written_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.ron");
    std::fs::write(
        &path,
        "// local overrides\n(\n    zoom: (min: 1.0, max: 2.0),\n)\n",
    )
    .unwrap();

    let config = ViewerConfig::from_file(&path).unwrap();
    assert_eq!(config.zoom, ZoomLimits::new(1.0, 2.0));
    assert_eq!(config.diff_offset, 127);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.ron");
    let err = ViewerConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.ron"));
}
