//! Builds learning methods from configuration records.
use crate::config::{AgentSpec, MethodKind};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use veld_core::methods::{
    ExpectedSarsa, Lspi, Method, MonteCarloOff, MonteCarloOn, QLearning, Sarsa, SarsaSemiGradient,
};
use veld_core::record::GridSnapshot;
use veld_core::scales::Scales;
use veld_core::schedule::Schedule;
use veld_core::valuerep::{LinearValues, TabularValues};
use veld_core::{Agent, Env, EpsilonGreedy};
use veld_env::basis::{BlackjackFourier, BlackjackPolynomial, BlackjackTiles, MazeFourier};
use veld_env::blackjack::{BlackjackConfig, BlackjackEnv};
use veld_env::maze::{MazeConfig, MazeEnv};

/// Environment identifiers of the configuration surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnvKind {
    /// Single-player blackjack.
    Blackjack,
    /// Noisy grid maze.
    Maze,
}

/// Overrides for the batch methods' iteration loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchLimits {
    /// Sweep budget.
    pub max_iterations: u64,
    /// Infinity-norm weight-change threshold that stops the loop.
    pub stopping_limit: f64,
}

fn alpha_required(spec: &AgentSpec) -> Result<Schedule> {
    match spec.alpha_schedule()? {
        Some(alpha) => Ok(alpha),
        None => bail!(
            "agent {}: method {:?} needs an alpha schedule",
            spec.name,
            spec.method
        ),
    }
}

/// Builds a learning method on the blackjack environment, together with
/// the snapshot grid of that environment.
pub fn build_blackjack(
    spec: &AgentSpec,
    variant: &str,
    batch: Option<BatchLimits>,
) -> Result<(Box<dyn Method<BlackjackEnv>>, GridSnapshot<BlackjackEnv>)> {
    let mut scales = Scales::new();
    let config = BlackjackConfig {
        variant: variant.to_string(),
    };
    let env = BlackjackEnv::build(&config, &mut scales)?;
    let snapshots = GridSnapshot::new(&env);
    let actions = env.actions().to_vec();
    let policy = EpsilonGreedy::new(spec.epsilon_schedule()?);
    let agent = Agent::new(spec.name.clone(), env, policy);

    let method: Box<dyn Method<BlackjackEnv>> = match spec.method {
        MethodKind::MonteCarloOn => Box::new(MonteCarloOn::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            spec.gamma,
        )),
        MethodKind::MonteCarloOff => Box::new(MonteCarloOff::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            spec.gamma,
        )),
        MethodKind::Qlearning => Box::new(QLearning::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::Sarsa => Box::new(Sarsa::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::SarsaExpected => Box::new(ExpectedSarsa::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::SgFcSarsa => Box::new(SarsaSemiGradient::new(
            spec.name.clone(),
            agent,
            LinearValues::new(actions, BlackjackFourier::new(&scales)?),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::SgPolSarsa => Box::new(SarsaSemiGradient::new(
            spec.name.clone(),
            agent,
            LinearValues::new(actions, BlackjackPolynomial::new(&mut scales)?),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::SgTcSarsa => Box::new(SarsaSemiGradient::new(
            spec.name.clone(),
            agent,
            LinearValues::new(actions, BlackjackTiles::new()),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::LsFcBatch => {
            let mut method = Lspi::new(
                spec.name.clone(),
                agent,
                LinearValues::new(actions, BlackjackFourier::new(&scales)?),
                spec.gamma,
            );
            apply_batch_limits(&mut method, batch);
            Box::new(method)
        }
        MethodKind::LsPolBatch => {
            let mut method = Lspi::new(
                spec.name.clone(),
                agent,
                LinearValues::new(actions, BlackjackPolynomial::new(&mut scales)?),
                spec.gamma,
            );
            apply_batch_limits(&mut method, batch);
            Box::new(method)
        }
        MethodKind::LsTcBatch => {
            let mut method = Lspi::new(
                spec.name.clone(),
                agent,
                LinearValues::new(actions, BlackjackTiles::new()),
                spec.gamma,
            );
            apply_batch_limits(&mut method, batch);
            Box::new(method)
        }
    };

    Ok((method, snapshots))
}

/// Builds a learning method on the maze environment, together with the
/// snapshot grid of that environment.
pub fn build_maze(
    spec: &AgentSpec,
    variant: &str,
    batch: Option<BatchLimits>,
) -> Result<(Box<dyn Method<MazeEnv>>, GridSnapshot<MazeEnv>)> {
    let mut scales = Scales::new();
    let config = MazeConfig::named(variant)?;
    let env = MazeEnv::build(&config, &mut scales)?;
    let snapshots = GridSnapshot::new(&env);
    let actions = env.actions().to_vec();
    let policy = EpsilonGreedy::new(spec.epsilon_schedule()?);
    let agent = Agent::new(spec.name.clone(), env, policy);

    let method: Box<dyn Method<MazeEnv>> = match spec.method {
        MethodKind::MonteCarloOn => Box::new(MonteCarloOn::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            spec.gamma,
        )),
        MethodKind::MonteCarloOff => Box::new(MonteCarloOff::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            spec.gamma,
        )),
        MethodKind::Qlearning => Box::new(QLearning::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::Sarsa => Box::new(Sarsa::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::SarsaExpected => Box::new(ExpectedSarsa::new(
            spec.name.clone(),
            agent,
            TabularValues::new(actions),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::SgFcSarsa => Box::new(SarsaSemiGradient::new(
            spec.name.clone(),
            agent,
            LinearValues::new(actions, MazeFourier::new(&scales)?),
            alpha_required(spec)?,
            spec.gamma,
        )),
        MethodKind::LsFcBatch => {
            let mut method = Lspi::new(
                spec.name.clone(),
                agent,
                LinearValues::new(actions, MazeFourier::new(&scales)?),
                spec.gamma,
            );
            apply_batch_limits(&mut method, batch);
            Box::new(method)
        }
        other => bail!(
            "agent {}: method {:?} has no value representation on the maze environment",
            spec.name,
            other
        ),
    };

    Ok((method, snapshots))
}

fn apply_batch_limits<E, B>(method: &mut Lspi<E, B>, batch: Option<BatchLimits>)
where
    E: Env,
    B: veld_core::valuerep::Basis<State = E::State, Act = E::Act>,
{
    if let Some(limits) = batch {
        method.set_batch_learning_parameters(
            Some(limits.max_iterations),
            Some(limits.stopping_limit),
        );
    }
}
