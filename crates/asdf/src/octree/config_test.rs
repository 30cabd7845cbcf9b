use super::*;

#[test]
fn test_defaults() {
  let config = BuildConfig::default();
  assert_eq!(config.max_error, 0.01);
  assert_eq!(config.max_depth, 3);
  assert_eq!(config.yield_interval, 32);
  assert_eq!(config.bounds_padding, 0.2);
  assert!(config.validate().is_ok());
  assert!(!config.is_empty());
}

#[test]
fn test_builders_chain() {
  let config = BuildConfig::default()
    .with_max_error(0.001)
    .with_max_depth(6)
    .with_yield_interval(4)
    .with_bounds_padding(0.0);

  assert_eq!(config.max_error, 0.001);
  assert_eq!(config.max_depth, 6);
  assert_eq!(config.yield_interval, 4);
  assert_eq!(config.bounds_padding, 0.0);
  assert!(config.validate().is_ok());
}

#[test]
fn test_non_positive_depth_is_empty_not_invalid() {
  for depth in [0, -1, -100] {
    let config = BuildConfig::default().with_max_depth(depth);
    assert!(config.is_empty());
    assert!(config.validate().is_ok());
  }
}

#[test]
fn test_rejects_bad_error_threshold() {
  for max_error in [0.0, -0.5, f32::NAN, f32::INFINITY] {
    let err = BuildConfig::default()
      .with_max_error(max_error)
      .validate()
      .unwrap_err();
    assert!(matches!(err, AsdfError::InvalidConfig(_)), "{:?}", err);
  }
}

#[test]
fn test_rejects_excessive_depth() {
  assert!(BuildConfig::default().with_max_depth(8).validate().is_ok());
  let err = BuildConfig::default().with_max_depth(9).validate().unwrap_err();
  assert!(err.to_string().contains("max_depth 9"));
}

#[test]
fn test_rejects_zero_yield_interval_and_negative_padding() {
  assert!(BuildConfig::default().with_yield_interval(0).validate().is_err());
  assert!(BuildConfig::default().with_bounds_padding(-0.1).validate().is_err());
}

#[test]
fn test_deserialize_fills_missing_fields() {
  let config: BuildConfig = serde_json::from_str(r#"{ "max_depth": 5 }"#).unwrap();
  assert_eq!(config.max_depth, 5);
  assert_eq!(config.max_error, 0.01);
  assert_eq!(config.yield_interval, 32);
}
