//! Single-player blackjack as an episodic environment.
pub mod game;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use veld_core::error::VeldError;
use veld_core::scales::Scales;
use veld_core::{Env, NextState};

use self::game::Game;

/// Observable game state: both visible scores and whether the player
/// holds a soft ace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlackjackState {
    /// Dealer's current best score.
    pub dealer: u32,
    /// Player's current best score.
    pub player: u32,
    /// Whether the player counts an ace as 11.
    pub soft: bool,
}

/// Player decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlackjackAct {
    /// Draw another card.
    Hit,
    /// Stop drawing and let the dealer play.
    Stand,
}

const ACTIONS: [BlackjackAct; 2] = [BlackjackAct::Hit, BlackjackAct::Stand];

/// Configuration of [`BlackjackEnv`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlackjackConfig {
    /// Rule variant. Only `simple` exists.
    pub variant: String,
}

impl Default for BlackjackConfig {
    fn default() -> Self {
        Self {
            variant: "simple".to_string(),
        }
    }
}

/// Blackjack environment.
///
/// Rewards are `-1` for busting or losing the showdown, `0` for a hit
/// that keeps the hand alive or a push, and `+1` for a win. Natural
/// two-card blackjacks are redealt so that every episode involves at
/// least one decision.
pub struct BlackjackEnv {
    game: Game,
    done: bool,
}

impl BlackjackEnv {
    fn observe(&self) -> Result<BlackjackState> {
        let (dealer, _) = self
            .game
            .dealer
            .best_score()
            .ok_or(VeldError::EpisodeTerminated)?;
        let (player, soft) = self
            .game
            .player
            .best_score()
            .ok_or(VeldError::EpisodeTerminated)?;
        Ok(BlackjackState {
            dealer,
            player,
            soft,
        })
    }
}

impl Env for BlackjackEnv {
    type Config = BlackjackConfig;
    type State = BlackjackState;
    type Act = BlackjackAct;

    fn build(config: &Self::Config, scales: &mut Scales) -> Result<Self> {
        if config.variant != "simple" {
            bail!("unknown blackjack variant: {}", config.variant);
        }

        scales.register("dealer", 2.0, 11.0)?;
        scales.register("player", 4.0, 21.0)?;

        Ok(Self {
            game: Game::new(),
            done: true,
        })
    }

    fn reset(&mut self) -> Result<()> {
        loop {
            self.game.deal();
            if !self.game.player.is_natural() {
                break;
            }
        }
        self.done = false;
        Ok(())
    }

    fn state(&self) -> Result<Self::State> {
        if self.done {
            bail!(VeldError::EpisodeTerminated);
        }
        self.observe()
    }

    fn apply(&mut self, action: &Self::Act) -> Result<(f64, NextState<Self::State>)> {
        if self.done {
            bail!(VeldError::EpisodeTerminated);
        }

        match action {
            BlackjackAct::Hit => {
                self.game.player.draw();
                if self.game.player.is_bust() {
                    self.done = true;
                    Ok((-1.0, NextState::Terminal))
                } else {
                    Ok((0.0, NextState::Valid(self.observe()?)))
                }
            }
            BlackjackAct::Stand => {
                self.done = true;
                let (player_score, _) = self
                    .game
                    .player
                    .best_score()
                    .ok_or(VeldError::EpisodeTerminated)?;

                let reward = match self.game.dealer_turn() {
                    None => 1.0,
                    Some(dealer_score) => {
                        if dealer_score > player_score {
                            -1.0
                        } else if dealer_score < player_score {
                            1.0
                        } else {
                            0.0
                        }
                    }
                };
                Ok((reward, NextState::Terminal))
            }
        }
    }

    fn actions(&self) -> &[Self::Act] {
        &ACTIONS
    }

    fn report_states(&self) -> Vec<Self::State> {
        let mut states = Vec::new();
        for dealer in 2..=11 {
            for player in 4..=21 {
                states.push(BlackjackState {
                    dealer,
                    player,
                    soft: false,
                });
            }
        }
        for dealer in 2..=11 {
            for player in 12..=21 {
                states.push(BlackjackState {
                    dealer,
                    player,
                    soft: true,
                });
            }
        }
        states
    }

    fn state_columns(&self) -> Vec<String> {
        vec!["dealer".to_string(), "player".to_string(), "soft".to_string()]
    }

    fn state_cells(state: &Self::State) -> Vec<f64> {
        vec![
            state.dealer as f64,
            state.player as f64,
            if state.soft { 1.0 } else { 0.0 },
        ]
    }

    fn action_cell(action: &Self::Act) -> f64 {
        match action {
            BlackjackAct::Hit => 1.0,
            BlackjackAct::Stand => 0.0,
        }
    }
}
