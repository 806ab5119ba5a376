#![allow(clippy::float_cmp)]
//! Action-value representations.
//!
//! Two families are provided: [`TabularValues`] stores one mutable node per
//! visited state-action pair, [`LinearValues`] approximates values as the
//! dot product of a weight vector with features from a pluggable
//! [`Basis`]. Both answer the queries the policy layer needs.
mod linear;
mod tabular;

pub use linear::{Basis, LinearValues};
pub use tabular::{Node, TabularValues};

use crate::base::{Action, State};
use anyhow::{ensure, Result};

/// Default estimate for a state-action pair that was never updated.
pub const DEFAULT_VALUE: f64 = 0.0;

/// Initial weight of linear representations.
pub const INITIAL_WEIGHT: f64 = 0.0;

/// Infinity-norm magnitude above which a single weight update is logged
/// as a sign of numerical instability.
pub const MAX_UPDATE_WARN_LIMIT: f64 = 1000.0;

/// Common contract of all action-value representations.
pub trait ValueRep<S: State, A: Action> {
    /// The registered action set.
    fn actions(&self) -> &[A];

    /// Current estimate for a state-action pair.
    fn value(&self, state: &S, action: &A) -> Result<f64>;

    /// A maximizing action, ties broken uniformly at random.
    ///
    /// The uniform tie-break is load-bearing: the policy layer's analytic
    /// action probabilities assume equiprobable optimal actions.
    fn greedy_action(&self, state: &S) -> Result<A> {
        let mut best = f64::NEG_INFINITY;
        let mut tied: Vec<A> = Vec::new();

        for action in self.actions() {
            let q = self.value(state, action)?;
            if q > best {
                best = q;
                tied.clear();
                tied.push(*action);
            } else if q == best {
                tied.push(*action);
            }
        }

        ensure!(!tied.is_empty(), "no actions registered");
        Ok(tied[fastrand::usize(..tied.len())])
    }

    /// A uniformly random action, independent of state.
    fn random_action(&self) -> A {
        let actions = self.actions();
        actions[fastrand::usize(..actions.len())]
    }

    /// Aggregate visit count of a state, for representations that track
    /// visits. The default says the capability is absent.
    fn state_visit_count(&self, _state: &S) -> Option<u64> {
        None
    }
}
