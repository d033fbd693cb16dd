//! # rlenv
//!
//! Command-line front end for the environment engine. Lists the built-in
//! scenarios, prints their spaces and constants, and runs episodes with a
//! built-in policy.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{Config, ConfigValue};
use rlenv::{run_scenario, scenarios, Policy, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rlenv", version, about = "Steppable control environments for RL agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered scenarios
    List,
    /// Print a scenario's action and observation spaces as JSON
    Spaces { scenario: String },
    /// Print a scenario's default constants as JSON
    Info { scenario: String },
    /// Run episodes with a built-in policy
    Run {
        scenario: String,
        #[arg(long, default_value_t = 1)]
        episodes: u32,
        /// Stop an episode after this many steps even if it has not ended
        #[arg(long)]
        max_episode_steps: Option<u32>,
        /// Defaults to the current time
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = Policy::Random)]
        policy: Policy,
        /// Config entry, repeatable; applied after --config
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, ConfigValue)>,
        /// JSON object of config entries
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_key_value(text: &str) -> Result<(String, ConfigValue), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{text}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{text}'"));
    }
    Ok((key.to_owned(), ConfigValue::parse_loose(value)))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() ^ (u64::from(elapsed.subsec_nanos()) << 20))
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let engine = scenarios::builtin_engine();
    match cli.command {
        Command::List => {
            let mut names = engine.list_scenarios();
            names.sort();
            for name in names {
                let scenario = engine.get_scenario(&name)?;
                println!("{name:<12} {}", scenario.description());
            }
        }
        Command::Spaces { scenario } => {
            let spaces = engine.get_scenario(&scenario)?.spaces();
            println!("{}", serde_json::to_string_pretty(&spaces)?);
        }
        Command::Info { scenario } => {
            let mut env = engine.create_environment(&scenario, &Config::new(), 0)?;
            let info = env.info();
            env.close()?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Run {
            scenario,
            episodes,
            max_episode_steps,
            seed,
            policy,
            set,
            config,
        } => {
            let mut options = RunOptions {
                episodes,
                max_episode_steps,
                seed: seed.unwrap_or_else(time_seed),
                policy,
                config: match config {
                    Some(path) => {
                        let json = std::fs::read_to_string(&path)
                            .with_context(|| format!("reading {}", path.display()))?;
                        Config::from_json_str(&json)
                            .with_context(|| format!("parsing {}", path.display()))?
                    }
                    None => Config::new(),
                },
            };
            for (key, value) in set {
                options.config.set(key, value);
            }

            let summaries = run_scenario(&engine, &scenario, &options)?;
            for summary in summaries {
                println!(
                    "{}",
                    serde_json::json!({
                        "episode": summary.episode,
                        "steps": summary.steps,
                        "total_reward": summary.total_reward,
                        "terminal": summary.terminal,
                    })
                );
            }
        }
    }
    Ok(())
}
