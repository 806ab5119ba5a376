//! Environment step.

/// Successor of an environment step: either a valid state or the terminal
/// sentinel.
///
/// The sentinel compares unequal to every valid state by construction and
/// update rules must never query a value representation for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NextState<S> {
    /// The episode continues in the given state.
    Valid(S),
    /// The episode has ended.
    Terminal,
}

impl<S> NextState<S> {
    /// Returns `true` for the terminal sentinel.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NextState::Terminal)
    }

    /// Returns the valid successor state, if any.
    pub fn valid(&self) -> Option<&S> {
        match self {
            NextState::Valid(s) => Some(s),
            NextState::Terminal => None,
        }
    }
}

/// A single transition `(s_t, a_t, r_t, s_t+1)`.
///
/// Transitions are produced once per environment step and are consumed by
/// the learning method that owns the episode or sample batch.
#[derive(Clone, Debug)]
pub struct Transition<S, A> {
    /// State the action was taken in.
    pub state: S,
    /// Action taken.
    pub action: A,
    /// Reward received.
    pub reward: f64,
    /// Successor state or the terminal sentinel.
    pub next_state: NextState<S>,
}
