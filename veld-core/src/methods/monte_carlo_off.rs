//! Off-policy Monte Carlo control with weighted importance sampling.
use super::episodic::{learn_episodes, EpisodeSummary, EpisodicLearner};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method};
use crate::agent::Agent;
use crate::base::{Env, NextState, Transition};
use crate::record::ValueSnapshot;
use crate::valuerep::TabularValues;
use anyhow::Result;

struct WeightedStep<S, A> {
    step: Transition<S, A>,
    /// Probability the behavior policy had of selecting the step's action.
    behavior_probability: f64,
}

/// Off-policy Monte Carlo over a tabular value representation.
///
/// Experience is generated by the epsilon-greedy behavior policy while
/// the greedy target policy is evaluated, corrected by weighted
/// importance sampling: per pair, `C += W` and `Q += (W / C) * (G - Q)`,
/// with `W` divided by the behavior probability after each step.
///
/// The backward pass exits early once the just-updated action is no
/// longer greedy under the updated table: every earlier step would be
/// zero-weighted under the target policy from that point on.
pub struct MonteCarloOff<E: Env> {
    name: String,
    agent: Agent<E>,
    values: TabularValues<E::State, E::Act>,
    gamma: f64,
}

impl<E: Env> MonteCarloOff<E> {
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

    fn sample_episode(
        &mut self,
        iteration: u64,
    ) -> Result<Vec<WeightedStep<E::State, E::Act>>> {
        let mut episode = Vec::new();
        let mut state = self.agent.state()?;

        loop {
            let action = self.agent.behavior_action(&self.values, &state, iteration)?;
            let behavior_probability =
                self.agent
                    .action_probability(&self.values, &state, &action, iteration)?;
            let (reward, next_state) = self.agent.apply(&action)?;

            episode.push(WeightedStep {
                step: Transition {
                    state: state.clone(),
                    action,
                    reward,
                    next_state: next_state.clone(),
                },
                behavior_probability,
            });

            match next_state {
                NextState::Terminal => return Ok(episode),
                NextState::Valid(s) => state = s,
            }
        }
    }

    fn backward_pass(&mut self, episode: &[WeightedStep<E::State, E::Act>]) {
        let mut returns_g = 0.0;
        let mut weight_w = 1.0;

        for weighted in episode.iter().rev() {
            let step = &weighted.step;
            returns_g = self.gamma * returns_g + step.reward;

            let node = self.values.node(&step.state, &step.action);
            let cumulative = node.cumulative_weight + weight_w;
            let visit_count = node.visit_count + 1;
            let new_q = node.value + weight_w / cumulative * (returns_g - node.value);

            self.values.update(&step.state, &step.action, |n| {
                n.value = new_q;
                n.visit_count = visit_count;
                n.cumulative_weight = cumulative;
            });

            weight_w /= weighted.behavior_probability;

            if !self.values.is_best_action(&step.state, &step.action) {
                return;
            }
        }
    }
}

impl<E: Env> EpisodicLearner<E> for MonteCarloOff<E> {
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
            reward: episode.iter().map(|weighted| weighted.step.reward).sum(),
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

impl<E: Env> Method<E> for MonteCarloOff<E> {
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
