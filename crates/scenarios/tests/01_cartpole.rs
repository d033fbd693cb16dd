use approx::assert_relative_eq;
use engine::{Action, Environment, Phase, Resettable, SimError, SpaceAware, Steppable};
use scenarios::{CartPoleEnv, CartPoleParams, CartPoleState};

fn upright() -> CartPoleEnv {
    let mut env = CartPoleEnv::new(500, 1);
    env.reset(None).unwrap();
    env.set_state(CartPoleState::default());
    env
}

#[test]
fn accelerations_from_rest_with_positive_force() {
    let params = CartPoleParams::default();
    let (theta_acc, x_acc) = params.accelerations(&CartPoleState::default(), 10.0);

    // temp = F / (mc + mp); theta_acc = -temp / (l * (4/3 - mp / (mc + mp)))
    let temp = 10.0 / 1.1;
    let expected_theta_acc = -temp / (0.5 * (4.0 / 3.0 - 0.1 / 1.1));
    let expected_x_acc = temp - 0.05 * expected_theta_acc / 1.1;

    assert_relative_eq!(theta_acc, expected_theta_acc, epsilon = 1e-12);
    assert_relative_eq!(x_acc, expected_x_acc, epsilon = 1e-12);
    assert_relative_eq!(theta_acc, -14.634, epsilon = 1e-3);
    assert_relative_eq!(x_acc, 9.756, epsilon = 1e-3);
}

#[test]
fn one_step_right_from_rest() {
    let mut env = upright();
    let result = env.step(&[Action::Int(1)]).unwrap();

    let s = env.state();
    assert_relative_eq!(s.x, 0.0);
    assert_relative_eq!(s.theta, 0.0);
    assert_relative_eq!(s.x_dot, 0.02 * 9.756_097_56, epsilon = 1e-6);
    assert_relative_eq!(s.theta_dot, 0.02 * -14.634_146_34, epsilon = 1e-6);
    assert_eq!(result.rewards, vec![1.0]);
    assert_eq!(result.dones, vec![false]);
    assert_eq!(result.observations[0].data(), s.to_vec().as_slice());
}

#[test]
fn action_encodings_pick_a_direction() {
    for (action, right) in [
        (Action::Bool(true), true),
        (Action::Bool(false), false),
        (Action::Float(0.5), true),
        (Action::Float(0.49), false),
        (Action::Int(0), false),
    ] {
        let mut env = upright();
        env.step(&[action.clone()]).unwrap();
        assert_eq!(env.state().x_dot > 0.0, right, "{action:?}");
    }
}

#[test]
fn failure_ends_episode_without_reward() {
    let mut env = upright();
    env.set_state(CartPoleState {
        theta: 0.3,
        theta_dot: 1.0,
        ..CartPoleState::default()
    });
    let result = env.step(&[Action::Int(0)]).unwrap();
    assert!(env.failed());
    assert!(result.is_done());
    assert_eq!(result.rewards, vec![0.0]);
    assert_eq!(env.phase(), Phase::Terminal);
}

#[test]
fn leaving_the_track_ends_episode_without_reward() {
    for (x, x_dot) in [(2.39, 1.0), (-2.39, -1.0)] {
        let mut env = upright();
        env.set_state(CartPoleState {
            x,
            x_dot,
            ..CartPoleState::default()
        });
        let result = env.step(&[Action::Int(1)]).unwrap();
        assert!(env.state().x.abs() > 2.4, "{x}");
        assert!(env.failed());
        assert_eq!(result.dones, vec![true]);
        assert_eq!(result.rewards, vec![0.0]);
        assert_eq!(env.phase(), Phase::Terminal);
    }
}

#[test]
fn surviving_to_the_budget_still_pays() {
    let mut env = CartPoleEnv::new(2, 1);
    env.reset(None).unwrap();
    env.set_state(CartPoleState::default());

    let first = env.step(&[Action::Int(1)]).unwrap();
    assert!(!first.is_done());
    let second = env.step(&[Action::Int(0)]).unwrap();
    assert!(second.is_done());
    assert_eq!(second.rewards, vec![1.0]);
}

#[test]
fn rejected_action_still_consumes_a_step() {
    let mut env = CartPoleEnv::new(2, 1);
    env.reset(None).unwrap();

    let err = env.step(&[Action::Str("left".into())]).unwrap_err();
    assert!(matches!(err, SimError::UnsupportedActionType { scenario: "cartpole", .. }));
    assert_eq!(env.current_step(), 1);

    let result = env.step(&[Action::Int(1)]).unwrap();
    assert_eq!(env.current_step(), 2);
    assert!(result.is_done());
}

#[test]
fn empty_action_list_is_rejected_before_counting() {
    let mut env = CartPoleEnv::new(10, 1);
    env.reset(None).unwrap();
    assert!(matches!(env.step(&[]), Err(SimError::NoActions)));
    assert_eq!(env.current_step(), 0);
}

#[test]
fn reset_samples_near_upright() {
    let mut env = CartPoleEnv::new(500, 9);
    let obs = env.reset(None).unwrap();
    assert_eq!(obs.len(), 1);
    assert!(obs[0].data().iter().all(|v| v.abs() <= 0.05));
    assert_eq!(obs[0].metadata()["step"], 0);
    assert_eq!(obs[0].metadata()["max_steps"], 500);
    assert!(env.spaces().observation_space.contains(obs[0].data()));
}
