//! Fourier cosine bases.
//!
//! Features are cosines of integer-multiple-of-pi combinations of the
//! rescaled state components, partitioned into disjoint zones indexed by
//! a discrete attribute so that different zones never share weights.
use crate::blackjack::{BlackjackAct, BlackjackState};
use crate::maze::{MazeAct, MazeState};
use itertools::Itertools;
use std::f64::consts::PI;
use veld_core::error::VeldError;
use veld_core::scales::{MinMaxScale, Scales};
use veld_core::valuerep::Basis;

fn unknown(key: &str) -> VeldError {
    VeldError::UnknownScale {
        key: key.to_string(),
    }
}

/// Fourier cosine basis over blackjack states.
///
/// Zones are the four combinations of soft-ace flag and action; within a
/// zone the features are `cos(pi * (c0 * dealer + c1 * player))` over all
/// coefficient pairs up to the order.
pub struct BlackjackFourier {
    coefficients: Vec<(u32, u32)>,
    dealer_scale: MinMaxScale,
    player_scale: MinMaxScale,
}

const BLACKJACK_ORDER: u32 = 6;
const BLACKJACK_ZONES: usize = 4;

fn blackjack_zone(soft: bool, action: BlackjackAct) -> usize {
    match (soft, action) {
        (true, BlackjackAct::Hit) => 0,
        (true, BlackjackAct::Stand) => 1,
        (false, BlackjackAct::Hit) => 2,
        (false, BlackjackAct::Stand) => 3,
    }
}

impl BlackjackFourier {
    /// Creates the basis against the scales registered by
    /// [`BlackjackEnv`](crate::blackjack::BlackjackEnv).
    pub fn new(scales: &Scales) -> Result<Self, VeldError> {
        Ok(Self {
            coefficients: (0..=BLACKJACK_ORDER)
                .cartesian_product(0..=BLACKJACK_ORDER)
                .collect(),
            dealer_scale: *scales.get("dealer").ok_or_else(|| unknown("dealer"))?,
            player_scale: *scales.get("player").ok_or_else(|| unknown("player"))?,
        })
    }
}

impl Basis for BlackjackFourier {
    type State = BlackjackState;
    type Act = BlackjackAct;

    fn dimension(&self) -> usize {
        self.coefficients.len() * BLACKJACK_ZONES
    }

    fn features(&self, state: &Self::State, action: &Self::Act) -> Vec<f64> {
        let dealer = self.dealer_scale.apply(state.dealer as f64);
        let player = self.player_scale.apply(state.player as f64);

        let start = blackjack_zone(state.soft, *action) * self.coefficients.len();
        let mut features = vec![0.0; self.dimension()];

        for (i, (c_dealer, c_player)) in self.coefficients.iter().enumerate() {
            features[start + i] =
                (*c_dealer as f64 * PI * dealer + *c_player as f64 * PI * player).cos();
        }
        features
    }
}

/// Fourier cosine basis over maze states, one zone per action.
pub struct MazeFourier {
    coefficients: Vec<(u32, u32)>,
    row_scale: MinMaxScale,
    col_scale: MinMaxScale,
}

const MAZE_ORDER: u32 = 4;
const MAZE_ZONES: usize = 4;

fn maze_zone(action: MazeAct) -> usize {
    match action {
        MazeAct::North => 0,
        MazeAct::East => 1,
        MazeAct::South => 2,
        MazeAct::West => 3,
    }
}

impl MazeFourier {
    /// Creates the basis against the scales registered by
    /// [`MazeEnv`](crate::maze::MazeEnv).
    pub fn new(scales: &Scales) -> Result<Self, VeldError> {
        Ok(Self {
            coefficients: (0..=MAZE_ORDER)
                .cartesian_product(0..=MAZE_ORDER)
                .collect(),
            row_scale: *scales.get("row").ok_or_else(|| unknown("row"))?,
            col_scale: *scales.get("col").ok_or_else(|| unknown("col"))?,
        })
    }
}

impl Basis for MazeFourier {
    type State = MazeState;
    type Act = MazeAct;

    fn dimension(&self) -> usize {
        self.coefficients.len() * MAZE_ZONES
    }

    fn features(&self, state: &Self::State, action: &Self::Act) -> Vec<f64> {
        let row = self.row_scale.apply(state.row as f64);
        let col = self.col_scale.apply(state.col as f64);

        let start = maze_zone(*action) * self.coefficients.len();
        let mut features = vec![0.0; self.dimension()];

        for (i, (c_row, c_col)) in self.coefficients.iter().enumerate() {
            features[start + i] = (*c_row as f64 * PI * row + *c_col as f64 * PI * col).cos();
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blackjack_scales() -> Scales {
        let mut scales = Scales::new();
        scales.register("dealer", 2.0, 11.0).unwrap();
        scales.register("player", 4.0, 21.0).unwrap();
        scales
    }

    #[test]
    fn blackjack_dimension_covers_all_zones() {
        let basis = BlackjackFourier::new(&blackjack_scales()).unwrap();
        assert_eq!(basis.dimension(), 49 * 4);
    }

    #[test]
    fn zones_are_disjoint() {
        let basis = BlackjackFourier::new(&blackjack_scales()).unwrap();
        let state = BlackjackState {
            dealer: 6,
            player: 15,
            soft: true,
        };
        let hit = basis.features(&state, &BlackjackAct::Hit);
        let stand = basis.features(&state, &BlackjackAct::Stand);

        for (i, (h, s)) in hit.iter().zip(stand.iter()).enumerate() {
            assert!(
                *h == 0.0 || *s == 0.0,
                "zones overlap at feature {}",
                i
            );
        }
        assert!(hit.iter().any(|f| *f != 0.0));
        assert!(stand.iter().any(|f| *f != 0.0));
    }

    #[test]
    fn constant_coefficient_gives_unit_feature() {
        let basis = BlackjackFourier::new(&blackjack_scales()).unwrap();
        let state = BlackjackState {
            dealer: 6,
            player: 15,
            soft: false,
        };
        let features = basis.features(&state, &BlackjackAct::Hit);
        // The (0, 0) coefficient of the active zone is cos(0) = 1.
        let start = 2 * 49;
        assert_eq!(features[start], 1.0);
    }

    #[test]
    fn maze_dimension_covers_all_zones() {
        let mut scales = Scales::new();
        scales.register("row", 0.0, 2.0).unwrap();
        scales.register("col", 0.0, 3.0).unwrap();
        let basis = MazeFourier::new(&scales).unwrap();
        assert_eq!(basis.dimension(), 25 * 4);
    }

    #[test]
    fn missing_scale_is_a_configuration_error() {
        let scales = Scales::new();
        assert!(BlackjackFourier::new(&scales).is_err());
        assert!(MazeFourier::new(&scales).is_err());
    }
}
