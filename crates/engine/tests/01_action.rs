use engine::{Action, ActionKind, SimError};

#[test]
fn float_accessor_widens_integers() {
    assert_eq!(Action::from(3_i32).as_f64().unwrap(), 3.0);
    assert_eq!(Action::from(2.5_f32).as_f64().unwrap(), 2.5);
    assert_eq!(Action::Int(-7).as_f64().unwrap(), -7.0);
}

#[test]
fn float_accessor_rejects_non_numeric_payloads() {
    for action in [
        Action::Bool(true),
        Action::Str("1.0".into()),
        Action::FloatSeq(vec![1.0]),
        Action::Bytes(vec![1]),
    ] {
        let err = action.as_f64().unwrap_err();
        assert!(
            matches!(err, SimError::TypeConversion { to: "f64", .. }),
            "unexpected error for {action:?}: {err}"
        );
    }
}

#[test]
fn int_accessor_truncates_floats() {
    assert_eq!(Action::Float(1.99).as_i64().unwrap(), 1);
    assert_eq!(Action::Int(42).as_i64().unwrap(), 42);
    assert!(Action::Bool(false).as_i64().is_err());
}

#[test]
fn bool_accessor_tests_numbers_for_non_zero() {
    assert!(Action::Bool(true).as_bool().unwrap());
    assert!(Action::Int(3).as_bool().unwrap());
    assert!(!Action::Float(0.0).as_bool().unwrap());
    assert!(Action::Str("true".into()).as_bool().is_err());
}

#[test]
fn sequence_conversion_is_all_or_nothing() {
    assert_eq!(
        Action::IntSeq(vec![1, -2, 3]).as_f64_vec().unwrap(),
        vec![1.0, -2.0, 3.0]
    );
    assert!(Action::BoolSeq(vec![true, false]).as_f64_vec().is_err());
    assert!(Action::Float(1.0).as_f64_vec().is_err());
}

#[test]
fn validate_only_rejects_absent_payloads() {
    assert!(Action::Float(1e9).validate().is_ok());
    assert!(Action::Int(-1_000).validate().is_ok());
    assert!(matches!(
        Action::FloatSeq(vec![]).validate(),
        Err(SimError::EmptyAction)
    ));
    assert!(Action::Bytes(vec![]).validate().is_err());
    assert!(Action::Str(String::new()).validate().is_err());
}

#[test]
fn expect_kind_names_the_scenario() {
    let err = Action::Str("left".into())
        .expect_kind("cartpole", &[ActionKind::Float, ActionKind::Int])
        .unwrap_err();
    assert_eq!(err.to_string(), "scenario 'cartpole' does not accept string actions");
}

#[test]
fn actions_round_trip_through_json() {
    let action = Action::IntSeq(vec![0, 2]);
    let json = serde_json::to_string(&action).unwrap();
    assert_eq!(json, r#"{"type":"int_seq","value":[0,2]}"#);
    let back: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(back, action);
}
