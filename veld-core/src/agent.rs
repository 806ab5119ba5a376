//! Agent: a named binding of an environment and a policy.
use crate::base::{Env, NextState, Transition};
use crate::policy::EpsilonGreedy;
use crate::valuerep::ValueRep;
use anyhow::Result;

/// Binds an environment and a policy, exposing the state, action and
/// transition primitives the learning methods are written against.
///
/// The agent holds no value representation of its own; methods own theirs
/// exclusively and pass it into every action-selection call.
pub struct Agent<E: Env> {
    name: String,
    env: E,
    policy: EpsilonGreedy,
}

impl<E: Env> Agent<E> {
    /// Creates an agent.
    pub fn new(name: impl Into<String>, env: E, policy: EpsilonGreedy) -> Self {
        Self {
            name: name.into(),
            env,
            policy,
        }
    }

    /// Name of the agent.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Starts a new episode in the environment.
    pub fn initialize(&mut self) -> Result<()> {
        self.env.reset()
    }

    /// Current environment state.
    pub fn state(&self) -> Result<E::State> {
        self.env.state()
    }

    /// Applies an action to the environment.
    pub fn apply(&mut self, action: &E::Act) -> Result<(f64, NextState<E::State>)> {
        self.env.apply(action)
    }

    /// Samples an action from the behavior policy.
    pub fn behavior_action<V>(&self, values: &V, state: &E::State, iteration: u64) -> Result<E::Act>
    where
        V: ValueRep<E::State, E::Act>,
    {
        self.policy.behavior_action(values, state, iteration)
    }

    /// Samples an action from the target (greedy) policy.
    pub fn target_action<V>(&self, values: &V, state: &E::State) -> Result<E::Act>
    where
        V: ValueRep<E::State, E::Act>,
    {
        self.policy.target_action(values, state)
    }

    /// Probability of the behavior policy selecting `action` at `state`.
    pub fn action_probability<V>(
        &self,
        values: &V,
        state: &E::State,
        action: &E::Act,
        iteration: u64,
    ) -> Result<f64>
    where
        V: ValueRep<E::State, E::Act>,
    {
        self.policy
            .action_probability(values, state, action, iteration)
    }

    /// Expected value of `state` under the behavior policy.
    pub fn state_value<V>(&self, values: &V, state: &E::State, iteration: u64) -> Result<f64>
    where
        V: ValueRep<E::State, E::Act>,
    {
        self.policy.state_value(values, state, iteration)
    }

    /// Performs one behavior-policy step and packages it as a
    /// [`Transition`].
    pub fn transition<V>(
        &mut self,
        values: &V,
        state: &E::State,
        iteration: u64,
    ) -> Result<Transition<E::State, E::Act>>
    where
        V: ValueRep<E::State, E::Act>,
    {
        let action = self.policy.behavior_action(values, state, iteration)?;
        let (reward, next_state) = self.env.apply(&action)?;
        Ok(Transition {
            state: state.clone(),
            action,
            reward,
            next_state,
        })
    }
}
