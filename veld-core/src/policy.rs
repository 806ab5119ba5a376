#![allow(clippy::float_cmp)]
//! Epsilon-greedy behavior and target policies.
use crate::base::{Action, State};
use crate::schedule::Schedule;
use crate::valuerep::ValueRep;
use anyhow::Result;

enum Rank {
    Best,
    TiedBest(usize),
    NotBest,
}

/// Epsilon-greedy policy over an action-value representation.
///
/// The behavior policy explores with probability epsilon drawn from a
/// [`Schedule`]; the target policy is purely greedy. Both read, never
/// write, the value representation — learning methods keep exclusive
/// ownership of it and pass it in by reference.
pub struct EpsilonGreedy {
    epsilon: Schedule,
}

impl EpsilonGreedy {
    /// Creates a policy with the given exploration schedule.
    pub fn new(epsilon: Schedule) -> Self {
        Self { epsilon }
    }

    /// Epsilon at a state, fed by the state's aggregate visit count when
    /// the representation tracks one, and by the iteration index.
    pub fn state_epsilon<S, A, V>(&self, values: &V, state: &S, iteration: u64) -> Result<f64>
    where
        S: State,
        A: Action,
        V: ValueRep<S, A>,
    {
        Ok(self
            .epsilon
            .value(values.state_visit_count(state), Some(iteration))?)
    }

    /// Samples an action from the behavior policy.
    pub fn behavior_action<S, A, V>(&self, values: &V, state: &S, iteration: u64) -> Result<A>
    where
        S: State,
        A: Action,
        V: ValueRep<S, A>,
    {
        let epsilon = self.state_epsilon(values, state, iteration)?;
        if fastrand::f64() <= epsilon {
            Ok(values.random_action())
        } else {
            values.greedy_action(state)
        }
    }

    /// Samples an action from the target (greedy) policy.
    pub fn target_action<S, A, V>(&self, values: &V, state: &S) -> Result<A>
    where
        S: State,
        A: Action,
        V: ValueRep<S, A>,
    {
        values.greedy_action(state)
    }

    /// Probability that the behavior policy selects `action` at `state`.
    ///
    /// Needed by off-policy corrections: a uniquely best action is chosen
    /// with `1 - eps + eps/|A|`, a tied-best one with
    /// `(1 - eps)/ties + eps/|A|`, any other with `eps/|A|`.
    pub fn action_probability<S, A, V>(
        &self,
        values: &V,
        state: &S,
        action: &A,
        iteration: u64,
    ) -> Result<f64>
    where
        S: State,
        A: Action,
        V: ValueRep<S, A>,
    {
        let epsilon = self.state_epsilon(values, state, iteration)?;
        self.probability_with(values, state, action, epsilon)
    }

    fn probability_with<S, A, V>(
        &self,
        values: &V,
        state: &S,
        action: &A,
        epsilon: f64,
    ) -> Result<f64>
    where
        S: State,
        A: Action,
        V: ValueRep<S, A>,
    {
        let my_value = values.value(state, action)?;
        let mut rank = Rank::Best;
        let mut tied = 1usize;

        for other in values.actions() {
            if other == action {
                continue;
            }
            let q = values.value(state, other)?;
            if q > my_value {
                rank = Rank::NotBest;
                break;
            } else if q == my_value {
                tied += 1;
                rank = Rank::TiedBest(tied);
            }
        }

        let n = values.actions().len() as f64;
        let probability = match rank {
            Rank::Best => 1.0 - epsilon + epsilon / n,
            Rank::TiedBest(ties) => (1.0 - epsilon) / ties as f64 + epsilon / n,
            Rank::NotBest => epsilon / n,
        };
        Ok(probability)
    }

    /// Expected value of `state` under the current behavior policy.
    pub fn state_value<S, A, V>(&self, values: &V, state: &S, iteration: u64) -> Result<f64>
    where
        S: State,
        A: Action,
        V: ValueRep<S, A>,
    {
        let epsilon = self.state_epsilon(values, state, iteration)?;
        let mut expected = 0.0;
        for action in values.actions() {
            let q = values.value(state, action)?;
            let probability = self.probability_with(values, state, action, epsilon)?;
            expected += probability * q;
        }
        Ok(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuerep::TabularValues;

    fn policy(epsilon: f64) -> EpsilonGreedy {
        EpsilonGreedy::new(Schedule::constant(epsilon))
    }

    #[test]
    fn probabilities_sum_to_one_with_unique_best() {
        let mut values = TabularValues::new(vec![0u8, 1, 2]);
        values.update(&"s", &1, |n| n.value = 1.0);
        values.update(&"s", &2, |n| n.value = -2.0);

        let policy = policy(0.3);
        let mut total = 0.0;
        for action in &[0u8, 1, 2] {
            total += policy.action_probability(&values, &"s", action, 1).unwrap();
        }
        assert!((total - 1.0).abs() < 1e-12);

        let best = policy.action_probability(&values, &"s", &1, 1).unwrap();
        assert!((best - (0.7 + 0.1)).abs() < 1e-12);
        let worst = policy.action_probability(&values, &"s", &2, 1).unwrap();
        assert!((worst - 0.1).abs() < 1e-12);
    }

    #[test]
    fn probabilities_sum_to_one_with_tied_best() {
        let mut values = TabularValues::new(vec![0u8, 1, 2]);
        values.update(&"s", &0, |n| n.value = 0.5);
        values.update(&"s", &1, |n| n.value = 0.5);

        let policy = policy(0.3);
        let mut total = 0.0;
        for action in &[0u8, 1, 2] {
            total += policy.action_probability(&values, &"s", action, 1).unwrap();
        }
        assert!((total - 1.0).abs() < 1e-12);

        let tied = policy.action_probability(&values, &"s", &0, 1).unwrap();
        assert!((tied - (0.7 / 2.0 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn state_value_is_expectation_under_policy() {
        let mut values = TabularValues::new(vec![0u8, 1]);
        values.update(&"s", &0, |n| n.value = 1.0);
        values.update(&"s", &1, |n| n.value = -1.0);

        let policy = policy(0.2);
        // P(best) = 0.8 + 0.1 = 0.9, P(other) = 0.1.
        let expected = 0.9 * 1.0 + 0.1 * -1.0;
        let v = policy.state_value(&values, &"s", 1).unwrap();
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_epsilon_behavior_is_greedy() {
        fastrand::seed(23);
        let mut values = TabularValues::new(vec![0u8, 1]);
        values.update(&"s", &1, |n| n.value = 3.0);

        let policy = policy(0.0);
        for _ in 0..50 {
            assert_eq!(policy.behavior_action(&values, &"s", 1).unwrap(), 1);
        }
    }
}
