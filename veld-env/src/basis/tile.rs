//! Tile coding over the blackjack state-action space.
use crate::blackjack::{BlackjackAct, BlackjackState};
use itertools::iproduct;
use std::cell::RefCell;
use std::collections::HashMap;
use veld_core::valuerep::Basis;

/// An axis-aligned box over (dealer, player, soft, action).
struct Tile {
    min_corner: [f64; 4],
    max_corner: [f64; 4],
}

impl Tile {
    fn new(corner: [i64; 4], sizes: [i64; 4]) -> Self {
        let mut min_corner = [0.0; 4];
        let mut max_corner = [0.0; 4];
        for i in 0..4 {
            min_corner[i] = corner[i] as f64;
            max_corner[i] = (corner[i] + sizes[i] - 1) as f64;
        }
        Self {
            min_corner,
            max_corner,
        }
    }

    fn contains(&self, point: &[f64; 4]) -> bool {
        self.min_corner
            .iter()
            .zip(self.max_corner.iter())
            .zip(point.iter())
            .all(|((min, max), x)| min <= x && x <= max)
    }
}

type CacheKey = (u32, u32, u8, u8);

/// Overlapping 6x6 tiles with stride 3 over dealer and player scores,
/// crossed with singleton tiles over the soft-ace and action indicators.
/// Each tile contributes one binary indicator feature.
///
/// Tile membership is memoized per exact state-action key; the state
/// space is small and the tile sweep is the expensive part.
pub struct BlackjackTiles {
    tiles: Vec<Tile>,
    cache: RefCell<HashMap<CacheKey, Vec<f64>>>,
}

const RANGES: [[i64; 2]; 4] = [[2, 11], [4, 21], [0, 1], [0, 1]];
const SIZES: [i64; 4] = [6, 6, 1, 1];
const STEPS: [i64; 4] = [3, 3, 1, 1];
const SHIFTS: [i64; 4] = [-5, -5, 0, 0];

impl BlackjackTiles {
    /// Builds the fixed tile set.
    pub fn new() -> Self {
        let mut corner_points: Vec<Vec<i64>> = Vec::with_capacity(4);
        for i in 0..4 {
            let start = RANGES[i][0] + SHIFTS[i];
            let end = RANGES[i][1] + 1;
            let points = (start..end).step_by(STEPS[i] as usize).collect();
            corner_points.push(points);
        }

        let tiles = iproduct!(
            corner_points[0].iter(),
            corner_points[1].iter(),
            corner_points[2].iter(),
            corner_points[3].iter()
        )
        .map(|(d, p, s, a)| Tile::new([*d, *p, *s, *a], SIZES))
        .collect();

        Self {
            tiles,
            cache: RefCell::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn cached_keys(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl Default for BlackjackTiles {
    fn default() -> Self {
        Self::new()
    }
}

impl Basis for BlackjackTiles {
    type State = BlackjackState;
    type Act = BlackjackAct;

    fn dimension(&self) -> usize {
        self.tiles.len()
    }

    fn features(&self, state: &Self::State, action: &Self::Act) -> Vec<f64> {
        let action_index = match action {
            BlackjackAct::Hit => 1u8,
            BlackjackAct::Stand => 0u8,
        };
        let key: CacheKey = (
            state.dealer,
            state.player,
            state.soft as u8,
            action_index,
        );

        if let Some(features) = self.cache.borrow().get(&key) {
            return features.clone();
        }

        let point = [
            state.dealer as f64,
            state.player as f64,
            state.soft as u8 as f64,
            action_index as f64,
        ];
        let features: Vec<f64> = self
            .tiles
            .iter()
            .map(|tile| if tile.contains(&point) { 1.0 } else { 0.0 })
            .collect();

        self.cache.borrow_mut().insert(key, features.clone());
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(dealer: u32, player: u32, soft: bool) -> BlackjackState {
        BlackjackState {
            dealer,
            player,
            soft,
        }
    }

    #[test]
    fn tile_count_matches_the_corner_grid() {
        let basis = BlackjackTiles::new();
        // Dealer corners -3..=9 step 3, player corners -1..=20 step 3,
        // two singleton dimensions.
        assert_eq!(basis.dimension(), 5 * 8 * 2 * 2);
    }

    #[test]
    fn every_state_activates_at_least_one_tile() {
        let basis = BlackjackTiles::new();
        for dealer in 2..=11 {
            for player in 4..=21 {
                for soft in &[false, true] {
                    for action in &[BlackjackAct::Hit, BlackjackAct::Stand] {
                        let features = basis.features(&state(dealer, player, *soft), action);
                        let active = features.iter().filter(|f| **f == 1.0).count();
                        assert!(
                            active >= 1,
                            "no active tile for ({}, {}, {})",
                            dealer,
                            player,
                            soft
                        );
                        // Stride-3 tiles of width 6 overlap twice per axis.
                        assert!(active <= 4);
                    }
                }
            }
        }
    }

    #[test]
    fn features_are_memoized_per_state_action_key() {
        let basis = BlackjackTiles::new();
        let s = state(6, 15, false);
        let first = basis.features(&s, &BlackjackAct::Hit);
        assert_eq!(basis.cached_keys(), 1);
        let second = basis.features(&s, &BlackjackAct::Hit);
        assert_eq!(basis.cached_keys(), 1);
        assert_eq!(first, second);

        basis.features(&s, &BlackjackAct::Stand);
        assert_eq!(basis.cached_keys(), 2);
    }

    #[test]
    fn action_dimension_separates_tiles() {
        let basis = BlackjackTiles::new();
        let s = state(6, 15, false);
        let hit = basis.features(&s, &BlackjackAct::Hit);
        let stand = basis.features(&s, &BlackjackAct::Stand);
        assert_ne!(hit, stand);
    }
}
