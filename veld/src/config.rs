//! Per-agent configuration records.
//!
//! A run configuration is a YAML list of [`AgentSpec`] records; each one
//! names a learning method, its exploration and learning-rate schedules
//! and the discount factor.
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use veld_core::schedule::{Schedule, ScheduleKind, ScheduleParams};

/// Defaults applied by the train binary.
pub mod defaults {
    /// Fraction of the run at which target-at schedules reach their
    /// target.
    pub const TARGET_AT_PERCENTAGE: f64 = 0.9;

    /// Sweep budget of batch methods.
    pub const BATCH_MAX_ITERATIONS: u64 = 20;

    /// Stopping limit of batch methods.
    pub const BATCH_STOPPING_LIMIT: f64 = 0.01;

    /// Episodes run by the evaluation pass.
    pub const EVALUATION_EPISODES: u64 = 10_000;

    /// Number of reporting checkpoints of episodic methods.
    pub const NUMBER_OF_REPORTS: u32 = 12;

    /// First reporting checkpoint of episodic methods.
    pub const FIRST_REPORT: u64 = 100;
}

/// Method identifiers of the configuration surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    /// On-policy Monte Carlo, tabular.
    MonteCarloOn,
    /// Off-policy Monte Carlo with weighted importance sampling, tabular.
    MonteCarloOff,
    /// Q-learning, tabular.
    Qlearning,
    /// SARSA, tabular.
    Sarsa,
    /// Expected SARSA, tabular.
    SarsaExpected,
    /// Semi-gradient SARSA on the Fourier cosine basis.
    SgFcSarsa,
    /// Semi-gradient SARSA on the polynomial basis.
    SgPolSarsa,
    /// Semi-gradient SARSA on tile coding.
    SgTcSarsa,
    /// LSPI on the Fourier cosine basis.
    LsFcBatch,
    /// LSPI on the polynomial basis.
    LsPolBatch,
    /// LSPI on tile coding.
    LsTcBatch,
}

impl MethodKind {
    /// Whether the method learns from a fixed sample batch instead of
    /// fresh episodes.
    pub fn is_batch(&self) -> bool {
        matches!(
            self,
            MethodKind::LsFcBatch | MethodKind::LsPolBatch | MethodKind::LsTcBatch
        )
    }
}

/// A schedule identifier, or the marker that the schedule is unused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleChoice {
    /// The method does not consume this schedule.
    #[serde(rename = "NOT_USED")]
    NotUsed,
    /// See [`ScheduleKind::Constant`].
    #[serde(rename = "CONSTANT")]
    Constant,
    /// See [`ScheduleKind::InvVisitCount`].
    #[serde(rename = "INV_VISIT_COUNT")]
    InvVisitCount,
    /// See [`ScheduleKind::InvVisitCountScaled`].
    #[serde(rename = "INV_VISIT_COUNT_SCALED")]
    InvVisitCountScaled,
    /// See [`ScheduleKind::InvRounds`].
    #[serde(rename = "INV_ROUNDS")]
    InvRounds,
    /// See [`ScheduleKind::InvRoundsScaled`].
    #[serde(rename = "INV_ROUNDS_SCALED")]
    InvRoundsScaled,
    /// See [`ScheduleKind::InvRoundsTargetAt`].
    #[serde(rename = "INV_ROUNDS_TARGET_AT")]
    InvRoundsTargetAt,
    /// See [`ScheduleKind::Exponential`].
    #[serde(rename = "EXPONENTIAL")]
    Exponential,
    /// See [`ScheduleKind::ExponentialTargetAt`].
    #[serde(rename = "EXPONENTIAL_TARGET_AT")]
    ExponentialTargetAt,
}

impl ScheduleChoice {
    /// The core schedule kind, unless the schedule is unused.
    pub fn kind(&self) -> Option<ScheduleKind> {
        match self {
            ScheduleChoice::NotUsed => None,
            ScheduleChoice::Constant => Some(ScheduleKind::Constant),
            ScheduleChoice::InvVisitCount => Some(ScheduleKind::InvVisitCount),
            ScheduleChoice::InvVisitCountScaled => Some(ScheduleKind::InvVisitCountScaled),
            ScheduleChoice::InvRounds => Some(ScheduleKind::InvRounds),
            ScheduleChoice::InvRoundsScaled => Some(ScheduleKind::InvRoundsScaled),
            ScheduleChoice::InvRoundsTargetAt => Some(ScheduleKind::InvRoundsTargetAt),
            ScheduleChoice::Exponential => Some(ScheduleKind::Exponential),
            ScheduleChoice::ExponentialTargetAt => Some(ScheduleKind::ExponentialTargetAt),
        }
    }

    /// Whether this is a target-at variant.
    pub fn is_target_at(&self) -> bool {
        matches!(
            self,
            ScheduleChoice::InvRoundsTargetAt | ScheduleChoice::ExponentialTargetAt
        )
    }
}

/// One learning agent of a run configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display name of the agent.
    pub name: String,
    /// Method identifier.
    pub method: MethodKind,
    /// Exploration-rate schedule identifier.
    pub epsilon_type: ScheduleChoice,
    /// Constant exploration rate.
    #[serde(default)]
    pub epsilon_constant: Option<f64>,
    /// Initial exploration rate.
    #[serde(default)]
    pub epsilon_initial: Option<f64>,
    /// Scaled/exponential decay parameter of the exploration schedule.
    #[serde(default)]
    pub epsilon_n0: Option<f64>,
    /// Iteration at which the exploration schedule reaches its target.
    #[serde(default)]
    pub epsilon_target_iterations: Option<u64>,
    /// Target exploration rate.
    #[serde(default)]
    pub epsilon_target: Option<f64>,
    /// Learning-rate schedule identifier.
    pub alpha_type: ScheduleChoice,
    /// Constant learning rate.
    #[serde(default)]
    pub alpha_constant: Option<f64>,
    /// Initial learning rate.
    #[serde(default)]
    pub alpha_initial: Option<f64>,
    /// Scaled/exponential decay parameter of the learning-rate schedule.
    #[serde(default)]
    pub alpha_a0: Option<f64>,
    /// Iteration at which the learning-rate schedule reaches its target.
    #[serde(default)]
    pub alpha_target_iterations: Option<u64>,
    /// Target learning rate.
    #[serde(default)]
    pub alpha_target: Option<f64>,
    /// Discount factor.
    pub gamma: f64,
}

impl AgentSpec {
    fn epsilon_params(&self) -> ScheduleParams {
        ScheduleParams {
            initial_value: self.epsilon_initial,
            target_value: self.epsilon_target,
            target_iterations: self.epsilon_target_iterations,
            constant_value: self.epsilon_constant,
            n0: self.epsilon_n0,
        }
    }

    fn alpha_params(&self) -> ScheduleParams {
        ScheduleParams {
            initial_value: self.alpha_initial,
            target_value: self.alpha_target,
            target_iterations: self.alpha_target_iterations,
            constant_value: self.alpha_constant,
            n0: self.alpha_a0,
        }
    }

    /// Builds the exploration schedule; every method needs one.
    pub fn epsilon_schedule(&self) -> Result<Schedule> {
        match self.epsilon_type.kind() {
            Some(kind) => Ok(Schedule::build(kind, &self.epsilon_params())?),
            None => bail!("agent {}: an epsilon schedule is required", self.name),
        }
    }

    /// Builds the learning-rate schedule; `None` for methods without one.
    pub fn alpha_schedule(&self) -> Result<Option<Schedule>> {
        match self.alpha_type.kind() {
            Some(kind) => Ok(Some(Schedule::build(kind, &self.alpha_params())?)),
            None => Ok(None),
        }
    }
}

/// Loads a YAML list of agent records.
pub fn load_agents(path: impl AsRef<Path>) -> Result<Vec<AgentSpec>> {
    let file = File::open(path)?;
    let rdr = BufReader::new(file);
    let agents = serde_yaml::from_reader(rdr)?;
    Ok(agents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
- name: q-blackjack
  method: Qlearning
  epsilon_type: CONSTANT
  epsilon_constant: 0.1
  alpha_type: INV_VISIT_COUNT
  alpha_initial: 1.0
  gamma: 1.0
- name: mc-off
  method: MonteCarloOff
  epsilon_type: INV_ROUNDS_TARGET_AT
  epsilon_initial: 0.4
  epsilon_target: 0.01
  epsilon_target_iterations: 9000
  alpha_type: NOT_USED
  gamma: 0.9
"#;

    #[test]
    fn agent_list_parses_from_yaml() {
        let agents: Vec<AgentSpec> = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].method, MethodKind::Qlearning);
        assert!(agents[0].alpha_schedule().unwrap().is_some());
        assert!(agents[1].alpha_schedule().unwrap().is_none());
        assert!(agents[1].epsilon_type.is_target_at());
        assert!(agents[1].epsilon_schedule().is_ok());
    }

    #[test]
    fn missing_schedule_parameters_fail() {
        let mut agents: Vec<AgentSpec> = serde_yaml::from_str(YAML).unwrap();
        agents[0].alpha_initial = None;
        assert!(agents[0].alpha_schedule().is_err());
    }

    #[test]
    fn batch_methods_are_flagged() {
        assert!(MethodKind::LsFcBatch.is_batch());
        assert!(MethodKind::LsTcBatch.is_batch());
        assert!(!MethodKind::Qlearning.is_batch());
    }
}
