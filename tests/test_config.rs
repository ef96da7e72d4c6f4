use std::path::Path;

use archery_range::config::*;
use archery_range::entities::*;

#[test]
fn empty_json_is_default() {
    assert_eq!(SimConfig::from_json_str("{}").unwrap(), SimConfig::default());
}

#[test]
fn defaults_validate() {
    let config = SimConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.surface, Size::new(1000.0, 600.0));
    assert_eq!(config.arrows_per_match, DEFAULT_ARROWS);
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = SimConfig::from_json_str(
        r#"{ "arrows_per_match": 5, "surface": { "width": 1200.0, "height": 700.0 } }"#,
    )
    .unwrap();
    assert_eq!(config.arrows_per_match, 5);
    assert_eq!(config.surface, Size::new(1200.0, 700.0));
    assert_eq!(config.layout, Layout::default());
}

#[test]
fn zero_arrows_rejected() {
    let err = SimConfig::from_json_str(r#"{ "arrows_per_match": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "arrows_per_match", .. }));
}

#[test]
fn bow_off_surface_rejected() {
    let err = SimConfig::from_json_str(r#"{ "bow_anchor": { "x": -5.0, "y": 300.0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "bow_anchor", .. }));
}

#[test]
fn actor_outside_surface_rejected() {
    let mut config = SimConfig::default();
    config.layout.launcher = Rect::new(980.0, 510.0, 70.0, 80.0);
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "layout.launcher", .. }));
}

#[test]
fn non_positive_size_rejected() {
    let mut config = SimConfig::default();
    config.arrow_size = Size::new(0.0, 4.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "arrow_size", .. })
    ));
}

#[test]
fn malformed_json_is_parse_error() {
    let err = SimConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("malformed config"));
}

#[test]
fn missing_file_is_io_error() {
    let err = SimConfig::load(Path::new("/nonexistent/archery.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
