//! Card game engine: an infinite single-deck blackjack table.
//!
//! Cards are drawn uniformly over the thirteen ranks; aces score 1 or 11,
//! face cards 10. The dealer draws to a fixed stand threshold.

/// Scores above this bust a hand.
pub const BUST_LIMIT: u32 = 21;

/// The dealer stands at this score or above.
pub const DEALER_STAND: u32 = 17;

// Rank 0 is the ace; its value is handled separately.
const CARD_VALUES: [u32; 13] = [0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

/// A hand of cards, stored as per-rank counts.
#[derive(Clone, Debug, Default)]
pub struct Hand {
    counts: [u8; 13],
}

impl Hand {
    /// Empties the hand.
    pub fn clear(&mut self) {
        self.counts = [0; 13];
    }

    /// Draws a uniformly random card into the hand, returning its rank.
    pub fn draw(&mut self) -> usize {
        let rank = fastrand::usize(..13);
        self.counts[rank] += 1;
        rank
    }

    /// Number of cards held.
    pub fn cards(&self) -> u32 {
        self.counts.iter().map(|c| *c as u32).sum()
    }

    /// All non-busting scores of the hand, lowest first, or `None` when
    /// the hand is bust.
    ///
    /// One score per usable ace valuation: every ace counts 1 in the
    /// lowest score and one of them may count 11 per further entry.
    pub fn scores(&self) -> Option<Vec<u32>> {
        let aces = self.counts[0] as u32;
        let without_aces: u32 = self
            .counts
            .iter()
            .zip(CARD_VALUES.iter())
            .skip(1)
            .map(|(count, value)| *count as u32 * value)
            .sum();

        let minimum = aces + without_aces;
        if minimum > BUST_LIMIT {
            return None;
        }

        let mut scores = vec![minimum];
        for _ in 0..aces {
            let raised = scores[scores.len() - 1] + 10;
            if raised > BUST_LIMIT {
                break;
            }
            scores.push(raised);
        }
        Some(scores)
    }

    /// Whether the hand is bust.
    pub fn is_bust(&self) -> bool {
        self.scores().is_none()
    }

    /// A two-card 21.
    pub fn is_natural(&self) -> bool {
        if self.cards() != 2 {
            return false;
        }
        match self.scores() {
            Some(scores) => scores.last().copied() == Some(BUST_LIMIT),
            None => false,
        }
    }

    /// Highest non-busting score and whether an ace is counted as 11,
    /// or `None` when bust.
    pub fn best_score(&self) -> Option<(u32, bool)> {
        let scores = self.scores()?;
        let soft = scores.len() > 1;
        scores.last().map(|score| (*score, soft))
    }
}

/// A blackjack table with one player hand and the dealer's hand.
#[derive(Clone, Debug, Default)]
pub struct Game {
    /// The player's hand.
    pub player: Hand,
    /// The dealer's hand.
    pub dealer: Hand,
}

impl Game {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deals a fresh round: one card to the dealer, two to the player.
    pub fn deal(&mut self) {
        self.dealer.clear();
        self.dealer.draw();
        self.player.clear();
        self.player.draw();
        self.player.draw();
    }

    /// Plays out the dealer's hand: hit below [`DEALER_STAND`], then
    /// stand. Returns the final score, or `None` when the dealer busts.
    pub fn dealer_turn(&mut self) -> Option<u32> {
        loop {
            let (score, _) = self.dealer.best_score()?;
            if score >= DEALER_STAND {
                return Some(score);
            }
            self.dealer.draw();
        }
    }
}
