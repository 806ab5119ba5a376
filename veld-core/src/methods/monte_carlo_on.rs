//! On-policy Monte Carlo control with every-visit averaging.
use super::episodic::{learn_episodes, EpisodeSummary, EpisodicLearner};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method};
use crate::agent::Agent;
use crate::base::{Env, NextState, Transition};
use crate::record::ValueSnapshot;
use crate::valuerep::TabularValues;
use anyhow::Result;

/// On-policy Monte Carlo over a tabular value representation.
///
/// Runs a full episode under the behavior policy, then walks it backwards
/// once, accumulating the return `G <- gamma * G + r` and averaging it
/// into each visited pair with a `1 / N(s, a)` step size. No separate
/// learning-rate schedule is involved.
pub struct MonteCarloOn<E: Env> {
    name: String,
    agent: Agent<E>,
    values: TabularValues<E::State, E::Act>,
    gamma: f64,
}

impl<E: Env> MonteCarloOn<E> {
    /// Creates the method.
    pub fn new(
        name: impl Into<String>,
        agent: Agent<E>,
        values: TabularValues<E::State, E::Act>,
        gamma: f64,
    ) -> Self {
        Self {
            name: name.into(),
            agent,
            values,
            gamma,
        }
    }

    /// The learned value table.
    pub fn values(&self) -> &TabularValues<E::State, E::Act> {
        &self.values
    }

    fn sample_episode(&mut self, iteration: u64) -> Result<Vec<Transition<E::State, E::Act>>> {
        let mut episode = Vec::new();
        let mut state = self.agent.state()?;

        loop {
            let step = self.agent.transition(&self.values, &state, iteration)?;
            let next_state = step.next_state.clone();
            episode.push(step);

            match next_state {
                NextState::Terminal => return Ok(episode),
                NextState::Valid(s) => state = s,
            }
        }
    }

    fn backward_pass(&mut self, episode: &[Transition<E::State, E::Act>]) {
        let mut returns_g = 0.0;

        for step in episode.iter().rev() {
            returns_g = self.gamma * returns_g + step.reward;

            let node = self.values.node(&step.state, &step.action);
            let visit_count = node.visit_count + 1;
            let new_q = node.value + (returns_g - node.value) / visit_count as f64;

            self.values.update(&step.state, &step.action, |n| {
                n.value = new_q;
                n.visit_count = visit_count;
            });
        }
    }
}

impl<E: Env> EpisodicLearner<E> for MonteCarloOn<E> {
    fn method_name(&self) -> &str {
        &self.name
    }

    fn agent_mut(&mut self) -> &mut Agent<E> {
        &mut self.agent
    }

    fn learn_episode(&mut self, iteration: u64) -> Result<EpisodeSummary> {
        let episode = self.sample_episode(iteration)?;
        self.backward_pass(&episode);

        Ok(EpisodeSummary {
            steps: episode.len(),
            reward: episode.iter().map(|step| step.reward).sum(),
        })
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

impl<E: Env> Method<E> for MonteCarloOn<E> {
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
