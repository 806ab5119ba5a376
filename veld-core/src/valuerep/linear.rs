//! Linear-in-features approximation of action values.
use super::{ValueRep, INITIAL_WEIGHT, MAX_UPDATE_WARN_LIMIT};
use crate::base::{Action, State};
use crate::error::VeldError;
use anyhow::Result;
use log::warn;
use ndarray::Array1;

/// A basis function: a deterministic, fixed-dimension feature encoding of
/// state-action pairs.
///
/// Implementations may memoize features internally; the mapping itself
/// must stay a pure function of the (scaled) state-action pair.
pub trait Basis {
    /// State type the basis encodes.
    type State: State;

    /// Action type the basis encodes.
    type Act: Action;

    /// Length of every feature vector this basis produces.
    fn dimension(&self) -> usize;

    /// Feature vector of a state-action pair.
    fn features(&self, state: &Self::State, action: &Self::Act) -> Vec<f64>;

    /// Weights a fresh [`LinearValues`] starts from.
    fn initial_weights(&self) -> Vec<f64> {
        vec![INITIAL_WEIGHT; self.dimension()]
    }
}

/// Action values as the dot product of a weight vector with basis
/// features.
///
/// The weight vector has the basis dimension and is mutated in place by
/// gradient steps ([`update_weights_by`](Self::update_weights_by)) or
/// wholesale replacement ([`set_weights_to`](Self::set_weights_to)).
#[derive(Clone, Debug)]
pub struct LinearValues<B: Basis> {
    actions: Vec<B::Act>,
    basis: B,
    weights: Array1<f64>,
}

fn inf_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0f64, |acc, x| acc.max(x.abs()))
}

impl<B: Basis> LinearValues<B> {
    /// Creates a representation over the given action set and basis.
    pub fn new(actions: Vec<B::Act>, basis: B) -> Self {
        let weights = Array1::from(basis.initial_weights());
        Self {
            actions,
            basis,
            weights,
        }
    }

    /// Length of the weight vector.
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// The underlying basis.
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// Current weight vector.
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Feature vector of a pair, checked against the weight dimension.
    pub fn features(&self, state: &B::State, action: &B::Act) -> Result<Array1<f64>, VeldError> {
        let features = self.basis.features(state, action);
        if features.len() != self.weights.len() {
            return Err(VeldError::DimensionMismatch {
                expected: self.weights.len(),
                got: features.len(),
            });
        }
        Ok(Array1::from(features))
    }

    /// Gradient of the value estimate with respect to the weights.
    ///
    /// Equals the feature vector since the model is linear.
    pub fn gradient(&self, state: &B::State, action: &B::Act) -> Result<Array1<f64>, VeldError> {
        self.features(state, action)
    }

    /// Current estimate for a state-action pair.
    pub fn value_of(&self, state: &B::State, action: &B::Act) -> Result<f64, VeldError> {
        Ok(self.features(state, action)?.dot(&self.weights))
    }

    /// Adds `delta` to the weights elementwise, in place.
    pub fn update_weights_by(&mut self, delta: &Array1<f64>) -> Result<(), VeldError> {
        if delta.len() != self.weights.len() {
            return Err(VeldError::DimensionMismatch {
                expected: self.weights.len(),
                got: delta.len(),
            });
        }

        let max_update = inf_norm(delta);
        if max_update > MAX_UPDATE_WARN_LIMIT {
            warn!("large update to weights, max change is {}", max_update);
        }

        self.weights += delta;
        Ok(())
    }

    /// Replaces the weight vector, returning the infinity norm of the
    /// change as a convergence signal.
    pub fn set_weights_to(&mut self, new_weights: Array1<f64>) -> Result<f64, VeldError> {
        if new_weights.len() != self.weights.len() {
            return Err(VeldError::DimensionMismatch {
                expected: self.weights.len(),
                got: new_weights.len(),
            });
        }

        let dist = self
            .weights
            .iter()
            .zip(new_weights.iter())
            .fold(0.0f64, |acc, (old, new)| acc.max((old - new).abs()));
        if dist > MAX_UPDATE_WARN_LIMIT {
            warn!("large update to weights, max change is {}", dist);
        }

        self.weights = new_weights;
        Ok(dist)
    }
}

impl<B: Basis> ValueRep<B::State, B::Act> for LinearValues<B> {
    fn actions(&self) -> &[B::Act] {
        &self.actions
    }

    fn value(&self, state: &B::State, action: &B::Act) -> Result<f64> {
        Ok(self.value_of(state, action)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PairBasis;

    impl Basis for PairBasis {
        type State = u8;
        type Act = bool;

        fn dimension(&self) -> usize {
            2
        }

        fn features(&self, state: &u8, action: &bool) -> Vec<f64> {
            vec![*state as f64, if *action { 1.0 } else { 0.0 }]
        }
    }

    struct BrokenBasis;

    impl Basis for BrokenBasis {
        type State = u8;
        type Act = bool;

        fn dimension(&self) -> usize {
            2
        }

        fn features(&self, _state: &u8, _action: &bool) -> Vec<f64> {
            vec![1.0, 2.0, 3.0]
        }
    }

    #[test]
    fn value_is_dot_product_of_weights_and_features() {
        let mut values = LinearValues::new(vec![true, false], PairBasis);
        values
            .update_weights_by(&Array1::from(vec![0.5, 2.0]))
            .unwrap();
        let q = values.value_of(&3, &true).unwrap();
        assert!((q - (0.5 * 3.0 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn dimension_mismatch_is_fatal() {
        let values = LinearValues::new(vec![true, false], BrokenBasis);
        assert!(matches!(
            values.value_of(&0, &true),
            Err(VeldError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn set_weights_returns_infinity_norm_of_change() {
        let mut values = LinearValues::new(vec![true, false], PairBasis);
        let dist = values
            .set_weights_to(Array1::from(vec![1.0, -4.0]))
            .unwrap();
        assert_eq!(dist, 4.0);
        let dist = values.set_weights_to(Array1::from(vec![1.0, -4.5])).unwrap();
        assert_eq!(dist, 0.5);
    }

    #[test]
    fn update_adds_elementwise() {
        let mut values = LinearValues::new(vec![true, false], PairBasis);
        values
            .update_weights_by(&Array1::from(vec![1.0, 1.0]))
            .unwrap();
        values
            .update_weights_by(&Array1::from(vec![-0.25, 2.0]))
            .unwrap();
        assert_eq!(values.weights().to_vec(), vec![0.75, 3.0]);
    }
}
