//! Hand-selected polynomial basis over blackjack state-action values.
use crate::blackjack::{BlackjackAct, BlackjackState};
use veld_core::error::VeldError;
use veld_core::scales::{MinMaxScale, Scales};
use veld_core::valuerep::Basis;

/// Raw state-action values a term is evaluated on.
#[derive(Clone, Copy, Debug)]
pub struct StateAction {
    /// Dealer score.
    pub dealer: f64,
    /// Player score.
    pub player: f64,
    /// Soft-ace indicator, 0 or 1.
    pub soft: f64,
    /// Hit indicator, 0 or 1.
    pub action: f64,
}

/// A named algebraic term with the bounds of its raw value.
pub struct Term {
    /// Name the term's scale is registered under.
    pub name: &'static str,
    /// Smallest raw value the term can take.
    pub min: f64,
    /// Largest raw value the term can take.
    pub max: f64,
    /// Evaluates the raw term value.
    pub eval: fn(StateAction) -> f64,
}

/// The selected monomials, up to fourth degree, over dealer score `d`,
/// player score `p`, soft-ace indicator `s` and hit indicator `a`.
///
/// Selected by a forward-backward model search against a long-run
/// off-policy Monte Carlo reference value function.
pub static TERMS: &[Term] = &[
    Term { name: "bias", min: 0.0, max: 1.0, eval: |_| 1.0 },
    Term { name: "d", min: 2.0, max: 11.0, eval: |x| x.dealer },
    Term { name: "p", min: 4.0, max: 21.0, eval: |x| x.player },
    Term { name: "s", min: 0.0, max: 1.0, eval: |x| x.soft },
    Term { name: "a", min: 0.0, max: 1.0, eval: |x| x.action },
    Term { name: "dp", min: 8.0, max: 231.0, eval: |x| x.dealer * x.player },
    Term { name: "da", min: 0.0, max: 11.0, eval: |x| x.dealer * x.action },
    Term { name: "pa", min: 0.0, max: 21.0, eval: |x| x.player * x.action },
    Term { name: "ps", min: 0.0, max: 21.0, eval: |x| x.player * x.soft },
    Term { name: "ds", min: 0.0, max: 11.0, eval: |x| x.dealer * x.soft },
    Term { name: "sa", min: 0.0, max: 1.0, eval: |x| x.soft * x.action },
    Term { name: "d2", min: 4.0, max: 121.0, eval: |x| x.dealer * x.dealer },
    Term { name: "p2", min: 16.0, max: 441.0, eval: |x| x.player * x.player },
    Term { name: "dpa", min: 0.0, max: 231.0, eval: |x| x.dealer * x.player * x.action },
    Term { name: "dps", min: 0.0, max: 231.0, eval: |x| x.dealer * x.player * x.soft },
    Term { name: "p2a", min: 0.0, max: 441.0, eval: |x| x.player * x.player * x.action },
    Term { name: "p2s", min: 0.0, max: 441.0, eval: |x| x.player * x.player * x.soft },
    Term { name: "d2a", min: 0.0, max: 121.0, eval: |x| x.dealer * x.dealer * x.action },
    Term { name: "d2p", min: 16.0, max: 2541.0, eval: |x| x.dealer * x.dealer * x.player },
    Term { name: "dp2", min: 32.0, max: 4851.0, eval: |x| x.dealer * x.player * x.player },
    Term { name: "d3", min: 8.0, max: 1331.0, eval: |x| x.dealer * x.dealer * x.dealer },
    Term { name: "p3", min: 64.0, max: 9261.0, eval: |x| x.player * x.player * x.player },
    Term { name: "psa", min: 0.0, max: 21.0, eval: |x| x.player * x.soft * x.action },
    Term { name: "p3a", min: 0.0, max: 9261.0, eval: |x| x.player * x.player * x.player * x.action },
    Term { name: "d2p2", min: 64.0, max: 53361.0, eval: |x| x.dealer * x.dealer * x.player * x.player },
    Term { name: "dp2a", min: 0.0, max: 4851.0, eval: |x| x.dealer * x.player * x.player * x.action },
    Term { name: "p4", min: 256.0, max: 194_481.0, eval: |x| x.player * x.player * x.player * x.player },
];

const INITIAL_WEIGHT_RANGE: f64 = 0.2;

/// Polynomial basis over blackjack: each term is evaluated on the raw
/// state-action values and independently rescaled to `[0, 1]`.
pub struct BlackjackPolynomial {
    scales: Vec<MinMaxScale>,
}

impl BlackjackPolynomial {
    /// Creates the basis, registering every term's bounds into the shared
    /// scale registry.
    pub fn new(scales: &mut Scales) -> Result<Self, VeldError> {
        let mut resolved = Vec::with_capacity(TERMS.len());
        for term in TERMS {
            scales.register(term.name, term.min, term.max)?;
            resolved.push(*scales.get(term.name).ok_or_else(|| {
                VeldError::UnknownScale {
                    key: term.name.to_string(),
                }
            })?);
        }
        Ok(Self { scales: resolved })
    }
}

impl Basis for BlackjackPolynomial {
    type State = BlackjackState;
    type Act = BlackjackAct;

    fn dimension(&self) -> usize {
        TERMS.len()
    }

    fn features(&self, state: &Self::State, action: &Self::Act) -> Vec<f64> {
        let values = StateAction {
            dealer: state.dealer as f64,
            player: state.player as f64,
            soft: if state.soft { 1.0 } else { 0.0 },
            action: match action {
                BlackjackAct::Hit => 1.0,
                BlackjackAct::Stand => 0.0,
            },
        };

        TERMS
            .iter()
            .zip(self.scales.iter())
            .map(|(term, scale)| scale.apply((term.eval)(values)))
            .collect()
    }

    fn initial_weights(&self) -> Vec<f64> {
        (0..self.dimension())
            .map(|_| INITIAL_WEIGHT_RANGE * (2.0 * fastrand::f64() - 1.0))
            .collect()
    }
}
