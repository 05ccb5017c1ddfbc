//! Runs the `pxs` binary against a throwaway config.

use std::path::Path;
use std::process::Command;

use tempfile::{TempDir, tempdir};

struct Run {
    ok: bool,
    stdout: String,
    stderr: String,
}

fn pxs_with_config(config: &Path, args: &[&str]) -> Run {
    let out = Command::new(env!("CARGO_BIN_EXE_pxs"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pxs");
    Run {
        ok: out.status.success(),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    }
}

fn default_config() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.ron");
    std::fs::write(&path, "(diff_offset: 127)").unwrap();
    (dir, path)
}

fn pxs(args: &[&str]) -> Run {
    let (_dir, config) = default_config();
    pxs_with_config(&config, args)
}

// ============================================================================
// fit / zoom
// ============================================================================

#[test]
fn test_fit_snaps_to_power_of_two() {
    let run = pxs(&["fit", "4000x3000", "1280x720"]);
    assert!(run.ok, "{}", run.stderr);
    assert_eq!(run.stdout.trim(), "Fit scale: 0.25");
}

#[test]
fn test_fit_toggle_returns_to_start() {
    let run = pxs(&["fit", "4000x3000", "1280x720", "--from", "2"]);
    assert!(run.ok, "{}", run.stderr);
    let lines: Vec<&str> = run.stdout.lines().collect();
    assert_eq!(lines[1], "Toggle: Scale: 2.00x  scroll (640, 360)");
    assert_eq!(lines[2], "    ->  Scale: 0.25x  scroll (0, 0)");
    assert_eq!(lines[3], "    ->  Scale: 2.00x  scroll (640, 360)");
}

#[test]
fn test_zoom_about_centre_and_anchor() {
    let run = pxs(&["zoom", "800x600", "--to", "4"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.contains("To:   Scale: 4.00x  scroll (1200, 900)"));

    let run = pxs(&["zoom", "800x600", "--scroll", "10,20", "--to", "2", "--at", "100,50"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.contains("To:   Scale: 2.00x  scroll (120, 90)"));
}

#[test]
fn test_zoom_respects_config_limits() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("narrow.ron");
    std::fs::write(&config, "(zoom: (min: 0.5, max: 2.0))").unwrap();
    let run = pxs_with_config(&config, &["zoom", "100x100", "--to", "64"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.contains("To:   Scale: 2.00x"));
}

#[test]
fn test_zoom_rejects_non_positive_target() {
    let run = pxs(&["zoom", "100x100", "--to", "0"]);
    assert!(!run.ok);
    assert!(run.stderr.contains("Target scale"));
}

// ============================================================================
// lut / channels
// ============================================================================

#[test]
fn test_lut_sixteen_bit_levels() {
    let run = pxs(&["lut", "-k", "u16", "-g", "2", "--saturation", "1023", "-l", "0,256,512"]);
    assert!(run.ok, "{}", run.stderr);
    let lines: Vec<&str> = run.stdout.lines().collect();
    assert_eq!(lines[0], "Offset: 0 Gain: 2.00 Sat: 1023 (uint16)");
    assert_eq!(lines[1].trim(), "0 ->   0");
    assert_eq!(lines[2].trim(), "256 -> 128");
    assert_eq!(lines[3].trim(), "512 -> 255");
}

#[test]
fn test_lut_zero_saturation_passthrough() {
    let run = pxs(&["lut", "--saturation", "0"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.contains("passes through unchanged"));
}

#[test]
fn test_lut_snapped_gain() {
    let run = pxs(&["lut", "-g", "3.1", "--snap", "-l", "10"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.starts_with("Offset: 0 Gain: 4.00 Sat: 255"));
    assert!(run.stdout.contains("10 ->  40"));
}

#[test]
fn test_channels_empty_selection_falls_back() {
    let run = pxs(&["channels", "3", "-s", "0,0,0"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.contains("Nothing selected: showing channel 0"));
    assert!(run.stdout.contains("Visible: [0]"));
}

#[test]
fn test_channels_reconciled_and_composited() {
    let run = pxs(&["-v", "channels", "4", "-s", "1,0"]);
    assert!(run.ok, "{}", run.stderr);
    assert!(run.stdout.contains("C1: hidden"));
    assert!(run.stdout.contains("C3: shown"));
    assert!(run.stdout.contains("Visible: [0, 2, 3]"));
    assert!(run.stdout.contains("Selected channels: 3"));
    assert!(run.stdout.contains("Composite of full-scale pixel: [255, 255, 255]"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_write_round_trip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("in.ron");
    std::fs::write(&source, "(diff_offset: 0, verbose: 1)").unwrap();
    let target = dir.path().join("out").join("config.ron");

    let run = pxs_with_config(&source, &["config", "--write", target.to_str().unwrap()]);
    assert!(run.ok, "{}", run.stderr);
    let text = std::fs::read_to_string(&target).unwrap();
    assert!(text.contains("diff_offset: 0"));
}

#[test]
fn test_bad_config_is_reported() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("broken.ron");
    std::fs::write(&config, "(zoom: (min: 4.0").unwrap();
    let run = pxs_with_config(&config, &["fit", "10x10", "10x10"]);
    assert!(!run.ok);
    assert!(run.stderr.contains("Failed to load config"));
}
