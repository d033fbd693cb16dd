use std::collections::HashSet;

use engine::{Action, Config, Environment, Phase, SimError};
use scenarios::{builtin_engine, BUILTIN_SCENARIOS};

/// A legal action for each built-in scenario.
fn legal_action(name: &str) -> Action {
    match name {
        "pendulum" | "simple" => Action::Float(0.5),
        _ => Action::Int(1),
    }
}

fn rollout(env: &mut Box<dyn Environment>, name: &str, steps: usize) -> Vec<Vec<f64>> {
    let mut trace = vec![env.reset(None).unwrap()[0].data().to_vec()];
    for _ in 0..steps {
        let result = env.step(&[legal_action(name)]).unwrap();
        trace.push(result.observations[0].data().to_vec());
        if result.is_done() {
            break;
        }
    }
    trace
}

#[test]
fn every_builtin_is_registered() {
    let engine = builtin_engine();
    let listed: HashSet<String> = engine.list_scenarios().into_iter().collect();
    let expected: HashSet<String> = BUILTIN_SCENARIOS.iter().map(|s| (*s).to_owned()).collect();
    assert_eq!(listed, expected);
}

#[test]
fn observations_match_declared_spaces() {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let scenario = engine.get_scenario(name).unwrap();
        let mut env = engine.create_environment(name, &Config::new(), 3).unwrap();
        let spaces = env.spaces();
        assert_eq!(spaces, scenario.spaces(), "{name}");

        let obs = env.reset(None).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].len(), spaces.observation_space.size(), "{name}");

        let result = env.step(&[legal_action(name)]).unwrap();
        assert_eq!(result.rewards.len(), 1);
        assert_eq!(result.dones.len(), 1);
        assert_eq!(result.observations[0].len(), spaces.observation_space.size(), "{name}");
    }
}

#[test]
fn same_seed_replays_the_same_episode() {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let mut a = engine.create_environment(name, &Config::new(), 99).unwrap();
        let mut b = engine.create_environment(name, &Config::new(), 99).unwrap();
        assert_eq!(rollout(&mut a, name, 25), rollout(&mut b, name, 25), "{name}");
    }
}

#[test]
fn config_seed_overrides_the_argument() {
    let engine = builtin_engine();
    let config = Config::new().with("seed", 5);
    let mut a = engine.create_environment("pendulum", &config, 1).unwrap();
    let mut b = engine.create_environment("pendulum", &Config::new(), 5).unwrap();
    assert_eq!(a.reset(None).unwrap(), b.reset(None).unwrap());
}

#[test]
fn reset_with_seed_reseeds() {
    let engine = builtin_engine();
    let mut a = engine.create_environment("lunarlander", &Config::new(), 1).unwrap();
    let mut b = engine.create_environment("lunarlander", &Config::new(), 2).unwrap();
    assert_eq!(a.reset(Some(40)).unwrap(), b.reset(Some(40)).unwrap());
}

#[test]
fn max_steps_config_is_honoured() {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let config = Config::new().with("max_steps", "3");
        let mut env = engine.create_environment(name, &config, 0).unwrap();
        assert!(rollout(&mut env, name, 10).len() <= 4, "{name}");
        assert_eq!(env.info()["max_steps"], 3, "{name}");
    }
}

#[test]
fn bad_config_is_wrapped_with_the_scenario_name() {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let config = Config::new().with("max_steps", "lots");
        match engine.create_environment(name, &config, 0) {
            Err(SimError::InvalidScenarioConfig { scenario, source }) => {
                assert_eq!(scenario, name);
                assert!(matches!(*source, SimError::ConfigInvalid { .. }));
            }
            Err(other) => panic!("{name}: unexpected error {other}"),
            Ok(_) => panic!("{name}: config should be rejected"),
        }
    }
}

#[test]
fn unknown_scenario() {
    let engine = builtin_engine();
    assert!(matches!(
        engine.create_environment("acrobot", &Config::new(), 0),
        Err(SimError::ScenarioNotFound(name)) if name == "acrobot"
    ));
}

#[test]
fn close_is_idempotent_and_final() {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let mut env = engine.create_environment(name, &Config::new(), 0).unwrap();
        env.reset(None).unwrap();
        env.close().unwrap();
        env.close().unwrap();
        assert_eq!(env.phase(), Phase::Closed);
        assert!(matches!(env.reset(None), Err(SimError::Closed)));
        assert!(matches!(env.step(&[legal_action(name)]), Err(SimError::Closed)));
    }
}

#[test]
fn stepping_past_terminal_is_allowed() {
    let engine = builtin_engine();
    let config = Config::new().with("max_steps", 1);
    let mut env = engine.create_environment("pendulum", &config, 0).unwrap();
    env.reset(None).unwrap();
    assert!(env.step(&[Action::Float(0.0)]).unwrap().is_done());
    assert!(env.step(&[Action::Float(0.0)]).unwrap().is_done());
    assert_eq!(env.phase(), Phase::Terminal);
}

#[test]
fn info_names_the_scenario() {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let env = engine.create_environment(name, &Config::new(), 0).unwrap();
        let info = env.info();
        assert_eq!(info["name"], name);
        assert_eq!(info["current_step"], 0);
        assert!(info["description"].as_str().is_some_and(|d| !d.is_empty()));
    }
}
