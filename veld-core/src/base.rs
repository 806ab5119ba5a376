//! Core abstractions.
mod env;
mod step;

pub use env::Env;
pub use step::{NextState, Transition};

use std::fmt::Debug;
use std::hash::Hash;

/// A valid environment state.
///
/// States are small, immutable and hashable values; they serve as one half
/// of the key under which action values are stored. The terminal sentinel
/// is not a state — it is carried separately by [`NextState`].
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// A discrete action from an environment-defined finite set.
pub trait Action: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> Action for T {}
