//! SARSA: on-policy temporal-difference control.
use super::episodic::{learn_episodes, EpisodeSummary, EpisodicLearner};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method};
use crate::agent::Agent;
use crate::base::{Env, NextState};
use crate::record::ValueSnapshot;
use crate::schedule::Schedule;
use crate::valuerep::{TabularValues, DEFAULT_VALUE};
use anyhow::Result;

/// SARSA over a tabular value representation.
///
/// The successor action is sampled from the behavior policy before the
/// update: `Q += alpha * (r + gamma * Q(s', a') - Q)`.
pub struct Sarsa<E: Env> {
    name: String,
    agent: Agent<E>,
    values: TabularValues<E::State, E::Act>,
    alpha: Schedule,
    gamma: f64,
}

impl<E: Env> Sarsa<E> {
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
        next_state: &NextState<E::State>,
        next_action: Option<&E::Act>,
        iteration: u64,
    ) -> Result<()> {
        let node = self.values.node(state, action);
        let visit_count = node.visit_count + 1;

        let next_q = match (next_state, next_action) {
            (NextState::Valid(s), Some(a)) => self.values.value_of(s, a),
            _ => DEFAULT_VALUE,
        };

        let alpha = self.alpha.value(Some(visit_count), Some(iteration))?;
        let new_q = node.value + alpha * (reward + self.gamma * next_q - node.value);

        self.values.update(state, action, |n| {
            n.value = new_q;
            n.visit_count = visit_count;
        });
        Ok(())
    }
}

impl<E: Env> EpisodicLearner<E> for Sarsa<E> {
    fn method_name(&self) -> &str {
        &self.name
    }

    fn agent_mut(&mut self) -> &mut Agent<E> {
        &mut self.agent
    }

    fn learn_episode(&mut self, iteration: u64) -> Result<EpisodeSummary> {
        let mut state = self.agent.state()?;
        let mut action = self.agent.behavior_action(&self.values, &state, iteration)?;
        let mut summary = EpisodeSummary {
            steps: 0,
            reward: 0.0,
        };

        loop {
            let (reward, next_state) = self.agent.apply(&action)?;

            let next_action = match &next_state {
                NextState::Terminal => None,
                NextState::Valid(s) => {
                    Some(self.agent.behavior_action(&self.values, s, iteration)?)
                }
            };

            self.update(
                &state,
                &action,
                reward,
                &next_state,
                next_action.as_ref(),
                iteration,
            )?;

            summary.steps += 1;
            summary.reward += reward;

            match (next_state, next_action) {
                (NextState::Valid(s), Some(a)) => {
                    state = s;
                    action = a;
                }
                _ => return Ok(summary),
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

impl<E: Env> Method<E> for Sarsa<E> {
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
