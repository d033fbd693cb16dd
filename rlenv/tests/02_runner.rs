use approx::assert_relative_eq;
use engine::{Action, ActionSpace, Config, SpaceType};
use rlenv::{run_episodes, run_scenario, sample_action, Policy, RunOptions};
use scenarios::{CartPoleEnv, TrackingEnv};

#[test]
fn episodes_stop_at_the_environment_budget() {
    let mut env = CartPoleEnv::new(500, 3);
    let summaries = run_episodes(&mut env, 3, None, |_| Action::Int(0)).unwrap();
    assert_eq!(summaries.len(), 3);
    for (i, summary) in summaries.iter().enumerate() {
        assert_eq!(summary.episode as usize, i);
        assert!(summary.terminal);
        // Pushing left every step topples the pole long before 500 steps.
        assert!(summary.steps < 500);
        assert_relative_eq!(summary.total_reward, f64::from(summary.steps - 1));
    }
}

#[test]
fn per_episode_cap_cuts_episodes_short() {
    let mut env = CartPoleEnv::new(500, 3);
    let summaries = run_episodes(&mut env, 2, Some(5), |_| Action::Int(1)).unwrap();
    for summary in summaries {
        assert_eq!(summary.steps, 5);
        assert!(!summary.terminal);
        assert_relative_eq!(summary.total_reward, 5.0);
    }
}

#[test]
fn policy_sees_the_latest_observation() {
    let mut env = TrackingEnv::new(100, 0.1, 5);
    // Observation index 2 is target - current: one step closes the gap.
    let summaries = run_episodes(&mut env, 4, None, |obs| Action::Float(obs.data()[2])).unwrap();
    for summary in summaries {
        assert_eq!(summary.steps, 1);
        assert!(summary.terminal);
        assert_relative_eq!(summary.total_reward, 10.0, epsilon = 1e-9);
    }
}

#[test]
fn sampled_actions_stay_in_the_space() {
    let rng = fastrand::Rng::with_seed(1);

    let discrete = ActionSpace::discrete(4);
    assert_eq!(sample_action(&discrete, Policy::Zero, &rng), Action::Int(0));
    for _ in 0..100 {
        match sample_action(&discrete, Policy::Random, &rng) {
            Action::Int(choice) => assert!((0..4).contains(&choice)),
            other => panic!("unexpected {other:?}"),
        }
    }

    let boxed = ActionSpace::boxed(vec![-2.0], vec![2.0]);
    assert_eq!(sample_action(&boxed, Policy::Zero, &rng), Action::Float(0.0));
    for _ in 0..100 {
        let action = sample_action(&boxed, Policy::Random, &rng);
        assert!(boxed.contains(&[action.as_f64().unwrap()]));
    }

    let shifted = ActionSpace::boxed(vec![1.0, 1.0], vec![3.0, 3.0]);
    assert_eq!(shifted.kind, SpaceType::Box);
    assert_eq!(
        sample_action(&shifted, Policy::Zero, &rng),
        Action::FloatSeq(vec![1.0, 1.0])
    );
}

#[test]
fn every_builtin_runs_with_both_policies() {
    let engine = scenarios::builtin_engine();
    for name in scenarios::BUILTIN_SCENARIOS {
        for policy in [Policy::Zero, Policy::Random] {
            let options = RunOptions {
                episodes: 2,
                max_episode_steps: Some(50),
                seed: 11,
                policy,
                config: Config::new(),
            };
            let summaries = run_scenario(&engine, name, &options).unwrap();
            assert_eq!(summaries.len(), 2, "{name}");
            assert!(summaries.iter().all(|s| s.steps >= 1 && s.steps <= 50), "{name}");
        }
    }
}

#[test]
fn seeded_runs_repeat() {
    let engine = scenarios::builtin_engine();
    let options = RunOptions {
        episodes: 3,
        seed: 42,
        config: Config::new().with("max_steps", 60),
        ..RunOptions::default()
    };
    let first = run_scenario(&engine, "mountaincar", &options).unwrap();
    let second = run_scenario(&engine, "mountaincar", &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn run_reports_config_errors() {
    let engine = scenarios::builtin_engine();
    let options = RunOptions {
        config: Config::new().with("max_steps", -1),
        ..RunOptions::default()
    };
    assert!(run_scenario(&engine, "pendulum", &options)
        .unwrap_err()
        .is_config_invalid());
}
