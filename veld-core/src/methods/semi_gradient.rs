//! Semi-gradient SARSA over linear function approximation.
use super::episodic::{learn_episodes, EpisodeSummary, EpisodicLearner};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method};
use crate::agent::Agent;
use crate::base::{Env, NextState};
use crate::record::ValueSnapshot;
use crate::schedule::Schedule;
use crate::valuerep::{Basis, LinearValues, DEFAULT_VALUE};
use anyhow::Result;

/// On-policy semi-gradient SARSA with a linear value representation.
///
/// The bootstrap target is treated as a constant, so the update moves the
/// weights along the feature vector of the updated pair:
/// `w += alpha * (r + gamma * Q(s', a') - Q(s, a)) * grad Q(s, a)`.
pub struct SarsaSemiGradient<E, B>
where
    E: Env,
    B: Basis<State = E::State, Act = E::Act>,
{
    name: String,
    agent: Agent<E>,
    values: LinearValues<B>,
    alpha: Schedule,
    gamma: f64,
}

impl<E, B> SarsaSemiGradient<E, B>
where
    E: Env,
    B: Basis<State = E::State, Act = E::Act>,
{
    /// Creates the method.
    pub fn new(
        name: impl Into<String>,
        agent: Agent<E>,
        values: LinearValues<B>,
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

    /// The learned linear representation.
    pub fn values(&self) -> &LinearValues<B> {
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
        let current_q = self.values.value_of(state, action)?;

        let next_q = match (next_state, next_action) {
            (NextState::Valid(s), Some(a)) => self.values.value_of(s, a)?,
            _ => DEFAULT_VALUE,
        };

        let alpha = self.alpha.value(None, Some(iteration))?;
        let change = alpha * (reward + self.gamma * next_q - current_q);
        let update = self.values.gradient(state, action)? * change;

        self.values.update_weights_by(&update)?;
        Ok(())
    }
}

impl<E, B> EpisodicLearner<E> for SarsaSemiGradient<E, B>
where
    E: Env,
    B: Basis<State = E::State, Act = E::Act>,
{
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
        snapshots.snapshot(&self.name, iteration, &|s, a| Ok(values.value_of(s, a)?), None)
    }
}

impl<E, B> Method<E> for SarsaSemiGradient<E, B>
where
    E: Env,
    B: Basis<State = E::State, Act = E::Act>,
{
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
