//! Tests for game config persistence

use std::fs;

use glovecatch::catch3d::types::{ContactBackend, GameConfig, ScoredPolicy};

#[test]
fn test_config_round_trips_through_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("glovecatch.json");

    let mut config = GameConfig::default();
    config.seed = 42;
    config.pool.size = 9;
    config.throw.bounce_height = 0.5;
    config.scoring.policy = ScoredPolicy::StickToTarget;
    config.collision.backend = ContactBackend::External;
    config.target.model_path = Some("models/glove.glb".to_string());

    config.save_to_file(&path).expect("config saves");
    let loaded = GameConfig::load_from_file(&path).expect("config loads");
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_is_an_error_naming_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.json");

    let err = GameConfig::load_from_file(&path).expect_err("file does not exist");
    assert!(err.contains("missing.json"), "{err}");

    let (config, error) = GameConfig::load_or_default(Some(&path));
    assert_eq!(config, GameConfig::default());
    assert!(error.is_some_and(|e| e.contains("missing.json")));
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"seed\": ").expect("write broken config");

    let err = GameConfig::load_from_file(&path).expect_err("broken JSON");
    assert!(err.starts_with("Failed to parse config"), "{err}");
    assert!(err.contains("broken.json"), "{err}");
}

#[test]
fn test_loaded_values_are_sanitized() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("negative.json");
    fs::write(
        &path,
        r#"{ "throw": { "fall_duration_ms": -10.0 }, "frame": { "max_frame_delta_ms": -1.0 } }"#,
    )
    .expect("write config");

    let config = GameConfig::load_from_file(&path).expect("config loads");
    assert_eq!(config.throw.fall_duration_ms, 0.0);
    assert_eq!(config.frame.max_frame_delta_ms, 0.0);
    assert_eq!(config.pool.size, 6);
}

#[test]
fn test_no_path_means_defaults() {
    assert_eq!(GameConfig::load_or_default(None), (GameConfig::default(), None));
}
