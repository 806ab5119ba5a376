//! Expected SARSA: on-policy control bootstrapping from the policy's
//! expected state value.
use super::episodic::{learn_episodes, EpisodeSummary, EpisodicLearner};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method};
use crate::agent::Agent;
use crate::base::{Env, NextState};
use crate::record::ValueSnapshot;
use crate::schedule::Schedule;
use crate::valuerep::{TabularValues, DEFAULT_VALUE};
use anyhow::Result;

/// Expected SARSA over a tabular value representation.
///
/// The update bootstraps from the expectation of the successor's action
/// values under the current epsilon-greedy policy:
/// `Q += alpha * (r + gamma * E[Q(s', .)] - Q)`.
pub struct ExpectedSarsa<E: Env> {
    name: String,
    agent: Agent<E>,
    values: TabularValues<E::State, E::Act>,
    alpha: Schedule,
    gamma: f64,
}

impl<E: Env> ExpectedSarsa<E> {
    /// Creates the method.
    pub fn new(
        name: impl Into<String>,
        agent: Agent<E>,
        values: TabularValues<E::State, E::Act>,
        alpha: Schedule,
        gamma: f64,
    ) -> Self {
        Self {
            name: name.into(),
            agent,
            values,
            alpha,
            gamma,
        }
    }

    /// The learned value table.
    pub fn values(&self) -> &TabularValues<E::State, E::Act> {
        &self.values
    }

    fn update(
        &mut self,
        state: &E::State,
        action: &E::Act,
        reward: f64,
        next_state_value: f64,
        iteration: u64,
    ) -> Result<()> {
        let node = self.values.node(state, action);
        let visit_count = node.visit_count + 1;

        let alpha = self.alpha.value(Some(visit_count), Some(iteration))?;
        let new_q = node.value + alpha * (reward + self.gamma * next_state_value - node.value);

        self.values.update(state, action, |n| {
            n.value = new_q;
            n.visit_count = visit_count;
        });
        Ok(())
    }
}

impl<E: Env> EpisodicLearner<E> for ExpectedSarsa<E> {
    fn method_name(&self) -> &str {
        &self.name
    }

    fn agent_mut(&mut self) -> &mut Agent<E> {
        &mut self.agent
    }

    fn learn_episode(&mut self, iteration: u64) -> Result<EpisodeSummary> {
        let mut state = self.agent.state()?;
        let mut summary = EpisodeSummary {
            steps: 0,
            reward: 0.0,
        };

        loop {
            let action = self.agent.behavior_action(&self.values, &state, iteration)?;
            let (reward, next_state) = self.agent.apply(&action)?;

            let next_state_value = match &next_state {
                NextState::Terminal => DEFAULT_VALUE,
                NextState::Valid(s) => self.agent.state_value(&self.values, s, iteration)?,
            };

            self.update(&state, &action, reward, next_state_value, iteration)?;

            summary.steps += 1;
            summary.reward += reward;

            match next_state {
                NextState::Terminal => return Ok(summary),
                NextState::Valid(s) => state = s,
            }
        }
    }

    fn write_snapshot(
        &self,
        iteration: u64,
        snapshots: &mut dyn ValueSnapshot<E::State, E::Act>,
    ) -> Result<()> {
        let values = &self.values;
        snapshots.snapshot(
            &self.name,
            iteration,
            &|s, a| Ok(values.value_of(s, a)),
            Some(&|s, a| values.node(s, a).visit_count),
        )
    }
}

impl<E: Env> Method<E> for ExpectedSarsa<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn learn(
        &mut self,
        iterations: u64,
        reporting_points: &[u64],
        snapshots: &mut dyn ValueSnapshot<E::State, E::Act>,
    ) -> Result<LearnOutcome> {
        learn_episodes(self, iterations, reporting_points, snapshots)
    }

    fn evaluate(&mut self, episodes: u64) -> Result<EvalOutcome> {
        evaluate_greedy(&mut self.agent, &self.values, episodes)
    }
}
