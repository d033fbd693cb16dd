use engine::{Config, ConfigValue, SimError};

#[test]
fn integers_accept_native_and_string_forms() {
    let config = Config::new().with("a", 10).with("b", "25").with("c", " 7 ");
    assert_eq!(config.get_i64("a").unwrap(), Some(10));
    assert_eq!(config.get_i64("b").unwrap(), Some(25));
    assert_eq!(config.get_i64("c").unwrap(), Some(7));
    assert_eq!(config.get_i64("missing").unwrap(), None);
}

#[test]
fn non_convertible_values_are_config_errors() {
    let config = Config::new().with("max_steps", true).with("tolerance", "abc");
    let err = config.get_i64("max_steps").unwrap_err();
    assert!(err.is_config_invalid());
    assert!(matches!(err, SimError::ConfigInvalid { ref key, .. } if key == "max_steps"));
    assert!(config.get_f64("tolerance").is_err());
}

#[test]
fn floats_widen_from_integers() {
    let config = Config::new().with("tolerance", 2).with("scale", "0.25");
    assert_eq!(config.get_f64("tolerance").unwrap(), Some(2.0));
    assert_eq!(config.get_f64("scale").unwrap(), Some(0.25));
}

#[test]
fn json_values_keep_their_native_types() {
    let config =
        Config::from_json_str(r#"{"max_steps": 300, "tolerance": 0.5, "verbose": true, "mode": "x"}"#)
            .unwrap();
    assert_eq!(config.get("max_steps"), Some(&ConfigValue::Int(300)));
    assert_eq!(config.get("tolerance"), Some(&ConfigValue::Float(0.5)));
    assert_eq!(config.get_bool("verbose").unwrap(), Some(true));
    assert_eq!(config.get("mode"), Some(&ConfigValue::Str("x".into())));
}

#[test]
fn json_arrays_are_rejected() {
    assert!(Config::from_json_str(r#"{"max_steps": [1, 2]}"#).is_err());
    assert!(Config::from_json_str("[]").is_err());
}

#[test]
fn seed_must_be_non_negative() {
    assert_eq!(Config::new().with("seed", 9).seed().unwrap(), Some(9));
    assert!(Config::new().with("seed", -1).seed().is_err());
    assert_eq!(Config::new().seed().unwrap(), None);
}

#[test]
fn configs_collect_from_pairs() {
    let config: Config = [("max_steps", "50"), ("tolerance", "0.2")].into_iter().collect();
    assert_eq!(config.len(), 2);
    assert_eq!(config.get_i64("max_steps").unwrap(), Some(50));
}
