//! Least-squares policy iteration over a fixed sample batch.
use super::batch::{sample_environment, SampleBatch};
use super::{evaluate_greedy, EvalOutcome, LearnOutcome, Method, RewardPoint};
use crate::agent::Agent;
use crate::base::{Env, NextState, Transition};
use crate::record::ValueSnapshot;
use crate::valuerep::{Basis, LinearValues, ValueRep};
use anyhow::{anyhow, Result};
use log::info;
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use std::collections::VecDeque;

const DEFAULT_MAX_ITERATIONS: u64 = 30;
const DEFAULT_STOPPING_LIMIT: f64 = 0.005;

/// Singular values below this are treated as zero in the pseudo-inverse.
const PINV_EPSILON: f64 = 1e-10;

/// Least-squares policy iteration with a linear value representation.
///
/// A fixed batch of episodes is sampled once under the untrained
/// behavior policy; each sweep then accumulates
/// `A += phi(s, a) (phi(s, a) - gamma * phi(s', a'))^T` and
/// `b += phi(s, a) * r` over the batch, with `a'` the greedy action under
/// the current weights, and solves `w = pinv(A) b`. Sweeps repeat until
/// the infinity-norm weight change falls below the stopping limit or the
/// sweep budget is exhausted. A terminal successor contributes a zero
/// feature vector. `A` and `b` carry over between sweeps.
pub struct Lspi<E, B>
where
    E: Env,
    B: Basis<State = E::State, Act = E::Act>,
{
    name: String,
    agent: Agent<E>,
    values: LinearValues<B>,
    gamma: f64,
    max_iterations: u64,
    stopping_limit: f64,
    matrix_a: DMatrix<f64>,
    vector_b: DVector<f64>,
    completed_sweeps: u64,
}

impl<E, B> Lspi<E, B>
where
    E: Env,
    B: Basis<State = E::State, Act = E::Act>,
{
    /// Creates the method.
    pub fn new(
        name: impl Into<String>,
        agent: Agent<E>,
        values: LinearValues<B>,
        gamma: f64,
    ) -> Self {
        let dimension = values.dimension();
        Self {
            name: name.into(),
            agent,
            values,
            gamma,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            stopping_limit: DEFAULT_STOPPING_LIMIT,
            matrix_a: DMatrix::zeros(dimension, dimension),
            vector_b: DVector::zeros(dimension),
            completed_sweeps: 0,
        }
    }

    /// Overrides the sweep budget and the stopping limit.
    pub fn set_batch_learning_parameters(
        &mut self,
        max_iterations: Option<u64>,
        stopping_limit: Option<f64>,
    ) {
        if let Some(max_iterations) = max_iterations {
            self.max_iterations = max_iterations;
        }
        if let Some(stopping_limit) = stopping_limit {
            self.stopping_limit = stopping_limit;
        }
    }

    /// The learned linear representation.
    pub fn values(&self) -> &LinearValues<B> {
        &self.values
    }

    /// Sweeps completed by the last [`learn`](Method::learn) call: the
    /// sweep at which the stopping limit was first satisfied, or the
    /// sweep budget if it never was.
    pub fn completed_sweeps(&self) -> u64 {
        self.completed_sweeps
    }

    fn policy_iteration(
        &mut self,
        samples: &[Transition<E::State, E::Act>],
        reporting_points: &[u64],
        snapshots: &mut dyn ValueSnapshot<E::State, E::Act>,
    ) -> Result<u64> {
        let mut points: VecDeque<u64> = reporting_points.iter().copied().collect();

        for sweep in 1..=self.max_iterations {
            let change = self.lstdq(samples)?;

            if points.front() == Some(&sweep) {
                info!("learning round {}: change is {}", sweep, change);
                self.write_snapshot(sweep, snapshots)?;
                points.pop_front();
            }

            if change < self.stopping_limit {
                return Ok(sweep);
            }
        }

        Ok(self.max_iterations)
    }

    fn lstdq(&mut self, samples: &[Transition<E::State, E::Act>]) -> Result<f64> {
        let dimension = self.values.dimension();

        for sample in samples {
            let phi = DVector::from_vec(
                self.values.features(&sample.state, &sample.action)?.to_vec(),
            );

            let phi_next = match &sample.next_state {
                NextState::Terminal => DVector::zeros(dimension),
                NextState::Valid(s) => {
                    let next_action = self.values.greedy_action(s)?;
                    DVector::from_vec(self.values.features(s, &next_action)?.to_vec())
                }
            };

            let discounted = &phi - &phi_next * self.gamma;
            self.matrix_a += &phi * discounted.transpose();
            self.vector_b += &phi * sample.reward;
        }

        let weights = self
            .matrix_a
            .clone()
            .pseudo_inverse(PINV_EPSILON)
            .map_err(|e| anyhow!("pseudo-inverse of the accumulated system failed: {}", e))?
            * &self.vector_b;

        let change = self
            .values
            .set_weights_to(Array1::from_iter(weights.iter().copied()))?;
        Ok(change)
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

impl<E, B> Method<E> for Lspi<E, B>
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
        info!(
            "method {} learning with a batch of {} sample episodes",
            self.name, iterations
        );

        let SampleBatch {
            steps,
            lengths,
            reward,
        } = sample_environment(&mut self.agent, &self.values, iterations)?;

        let mut rewards = Vec::new();
        if !reporting_points.is_empty() {
            info!("learning round initial");
            self.write_snapshot(0, snapshots)?;
            rewards.push(RewardPoint {
                agent: self.name.clone(),
                iteration: 0,
                reward,
            });
        }

        self.completed_sweeps = self.policy_iteration(&steps, reporting_points, snapshots)?;

        Ok(LearnOutcome { rewards, lengths })
    }

    fn evaluate(&mut self, episodes: u64) -> Result<EvalOutcome> {
        evaluate_greedy(&mut self.agent, &self.values, episodes)
    }
}
