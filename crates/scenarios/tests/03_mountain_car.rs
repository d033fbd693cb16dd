use approx::assert_relative_eq;
use engine::{Action, Environment, Resettable, SimError, SpaceAware, Steppable};
use scenarios::{MountainCarEnv, MountainCarState};

fn at(position: f64, velocity: f64) -> MountainCarEnv {
    let mut env = MountainCarEnv::new(200, 11);
    env.reset(None).unwrap();
    env.set_state(MountainCarState { position, velocity });
    env
}

#[test]
fn coasting_from_the_valley_floor() {
    let position = -0.5;
    let mut env = at(position, 0.0);
    let result = env.step(&[Action::Int(1)]).unwrap();

    let expected_velocity = (3.0_f64 * position).cos() * -0.0025;
    assert_relative_eq!(env.state().velocity, expected_velocity, epsilon = 1e-12);
    assert_relative_eq!(env.state().position, position + expected_velocity, epsilon = 1e-12);
    assert_eq!(result.rewards, vec![-1.0]);
    assert!(!result.is_done());
}

#[test]
fn left_wall_stops_the_car() {
    let mut env = at(-1.19, -0.07);
    env.step(&[Action::Int(0)]).unwrap();
    assert_relative_eq!(env.state().position, -1.2);
    assert_relative_eq!(env.state().velocity, 0.0);
}

#[test]
fn velocity_is_clamped() {
    let mut env = at(-0.5, 0.0699);
    env.step(&[Action::Int(2)]).unwrap();
    assert!(env.state().velocity <= 0.07);
}

#[test]
fn reaching_the_goal_ends_with_zero_reward() {
    let mut env = at(0.49, 0.07);
    let result = env.step(&[Action::Int(2)]).unwrap();
    assert!(env.goal_reached());
    assert!(result.is_done());
    assert_eq!(result.rewards, vec![0.0]);
    assert_eq!(result.observations[0].metadata()["goal_reached"], true);
}

#[test]
fn floats_are_bucketed_into_thirds() {
    for (value, choice) in [(0.0, 0), (0.32, 0), (0.5, 1), (0.66, 1), (0.67, 2), (1.0, 2)] {
        let mut from_float = at(-0.5, 0.0);
        let mut from_int = at(-0.5, 0.0);
        from_float.step(&[Action::Float(value)]).unwrap();
        from_int.step(&[Action::Int(choice)]).unwrap();
        assert_eq!(from_float.state(), from_int.state(), "{value}");
    }
}

#[test]
fn bool_actions_are_rejected() {
    let mut env = at(-0.5, 0.0);
    assert!(matches!(
        env.step(&[Action::Bool(true)]),
        Err(SimError::UnsupportedActionType { scenario: "mountaincar", .. })
    ));
}

#[test]
fn reset_starts_at_rest_left_of_the_valley() {
    let mut env = MountainCarEnv::new(200, 4);
    for seed in 0..20 {
        let obs = env.reset(Some(seed)).unwrap();
        let data = obs[0].data();
        assert!((-1.2..-0.6).contains(&data[0]));
        assert_eq!(data[1], 0.0);
        assert!(env.spaces().observation_space.contains(data));
    }
    assert_eq!(env.info()["goal_position"], 0.5);
}

#[test]
fn right_wall_clamps_position() {
    let mut env = at(0.59, 0.07);
    let result = env.step(&[Action::Int(2)]).unwrap();
    assert_eq!(env.state().position, 0.6);
    assert_relative_eq!(env.state().velocity, 0.07);
    assert!(result.is_done());
}

#[test]
fn position_stays_in_bounds_under_any_actions() {
    let rng = fastrand::Rng::with_seed(99);
    let mut env = MountainCarEnv::new(5_000, 3);
    env.reset(None).unwrap();
    for _ in 0..5_000 {
        let action = match rng.u8(0..4) {
            0 => Action::Int(rng.i64(-5..8)),
            1 => Action::Int(if rng.bool() { i64::MAX } else { i64::MIN }),
            2 => Action::Float(rng.f64() * 4.0 - 2.0),
            _ => Action::Int(rng.i64(0..3)),
        };
        let result = env.step(&[action]).unwrap();
        let position = env.state().position;
        assert!((-1.2..=0.6).contains(&position), "{position}");
        assert!(env.state().velocity.abs() <= 0.07);
        if result.is_done() {
            env.reset(None).unwrap();
        }
    }
}
