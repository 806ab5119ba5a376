#![warn(missing_docs)]
//! Environments and basis functions for the veld learning core.
//!
//! Two episodic environments are provided — a single-player blackjack
//! table and a noisy grid maze — together with the basis-function catalog
//! used by the linear value representations on them.
pub mod basis;
pub mod blackjack;
pub mod maze;

pub use blackjack::{BlackjackAct, BlackjackConfig, BlackjackEnv, BlackjackState};
pub use maze::{MazeAct, MazeConfig, MazeEnv, MazeState};
