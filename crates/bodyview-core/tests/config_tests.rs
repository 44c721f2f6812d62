use bodyview_core::{Color, CoreError, ViewerConfig};

#[test]
fn test_viewer_config_default() {
    let config = ViewerConfig::default();
    assert_eq!(config.window.circle_segments, 32);
    assert_eq!(config.status.update_interval_ms, 1000);
    assert_eq!(config.sensor.body_count, 6);
    assert_eq!(config.style.hand_radius, 30.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = ViewerConfig::from_toml(
        r#"
        [window]
        circle_segments = 48

        [style]
        joint_radius = 4.0
        tracked_bone_color = { r = 1.0, g = 1.0, b = 0.0, a = 1.0 }
        "#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.window.circle_segments, 48);
    assert_eq!(config.window.target_fps, 60.0);
    assert_eq!(config.style.joint_radius, 4.0);
    assert_eq!(config.style.hand_radius, 30.0);
    assert_eq!(
        config.style.tracked_bone_color,
        Color {
            r: 1.0,
            g: 1.0,
            b: 0.0,
            a: 1.0
        }
    );
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_values_rejected() {
    let err = ViewerConfig::from_toml("[window]\ncircle_segments = 2\n").unwrap_err();
    assert!(matches!(err, CoreError::InvalidConfig(_)));

    let err = ViewerConfig::from_toml("[status]\nupdate_interval_ms = 0\n").unwrap_err();
    assert!(matches!(err, CoreError::InvalidConfig(_)));

    let err =
        ViewerConfig::from_toml("[sensor]\nbody_count = 1\nsimulated_bodies = 2\n").unwrap_err();
    assert!(matches!(err, CoreError::InvalidConfig(_)));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = ViewerConfig::from_toml("[window\n").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParse(_)));
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("bodyview.toml");

    let mut config = ViewerConfig::default();
    config.window.title = "Booth 3".to_string();
    config.sensor.drop_every = 0;
    config.save(&path).expect("Failed to save config");

    let loaded = ViewerConfig::load(&path).expect("Failed to load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_load_or_default_on_missing_and_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert_eq!(ViewerConfig::load_or_default(&missing), ViewerConfig::default());

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "window = 3").unwrap();
    assert_eq!(ViewerConfig::load_or_default(&broken), ViewerConfig::default());
}

#[test]
fn test_rates_out_of_range_rejected() {
    for toml in [
        "[sensor]\nframe_rate = 1e-20\n",
        "[sensor]\nframe_rate = 0.5\n",
        "[sensor]\nframe_rate = 5000.0\n",
        "[sensor]\nframe_rate = inf\n",
        "[sensor]\nframe_rate = nan\n",
        "[window]\ntarget_fps = 1e-30\n",
        "[window]\ntarget_fps = -1.0\n",
        "[window]\ntarget_fps = inf\n",
        "[window]\ntarget_fps = nan\n",
    ] {
        let err = ViewerConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)), "{}", toml);
    }
}

#[test]
fn test_rate_bounds_accepted() {
    let config = ViewerConfig::from_toml(
        "[window]\ntarget_fps = 0.0\n[sensor]\nframe_rate = 1000.0\n",
    )
    .unwrap();
    assert_eq!(config.window.target_fps, 0.0);

    let config =
        ViewerConfig::from_toml("[window]\ntarget_fps = 1.0\n[sensor]\nframe_rate = 1.0\n")
            .unwrap();
    assert_eq!(config.sensor.frame_rate, 1.0);
}
