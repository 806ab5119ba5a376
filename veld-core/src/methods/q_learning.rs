//! Q-learning: off-policy temporal-difference control.
use super::episodic::{learn_episodes, EpisodeSummary, EpisodicLearner};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method};
use crate::agent::Agent;
use crate::base::{Env, NextState, Transition};
use crate::record::ValueSnapshot;
use crate::schedule::Schedule;
use crate::valuerep::{TabularValues, DEFAULT_VALUE};
use anyhow::Result;

/// Q-learning over a tabular value representation.
///
/// Behavior is epsilon-greedy; the update target bootstraps from the
/// maximum action value of the successor:
/// `Q += alpha * (r + gamma * max_a' Q(s', a') - Q)`.
pub struct QLearning<E: Env> {
    name: String,
    agent: Agent<E>,
    values: TabularValues<E::State, E::Act>,
    alpha: Schedule,
    gamma: f64,
}

impl<E: Env> QLearning<E> {
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

    fn update(&mut self, step: &Transition<E::State, E::Act>, iteration: u64) -> Result<()> {
        let node = self.values.node(&step.state, &step.action);
        let visit_count = node.visit_count + 1;

        let next_q = match &step.next_state {
            NextState::Terminal => DEFAULT_VALUE,
            NextState::Valid(s) => self.values.max_value(s),
        };

        let alpha = self.alpha.value(Some(visit_count), Some(iteration))?;
        let new_q = node.value + alpha * (step.reward + self.gamma * next_q - node.value);

        self.values.update(&step.state, &step.action, |n| {
            n.value = new_q;
            n.visit_count = visit_count;
        });
        Ok(())
    }
}

impl<E: Env> EpisodicLearner<E> for QLearning<E> {
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
            let step = self.agent.transition(&self.values, &state, iteration)?;
            self.update(&step, iteration)?;

            summary.steps += 1;
            summary.reward += step.reward;

            match step.next_state {
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

impl<E: Env> Method<E> for QLearning<E> {
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
