//! Basis functions for the linear value representations.
//!
//! Every basis produces a fixed-dimension feature vector for a
//! state-action pair; the catalog here covers the two environments of
//! this crate.
mod fourier;
mod polynomial;
mod tile;

pub use fourier::{BlackjackFourier, MazeFourier};
pub use polynomial::BlackjackPolynomial;
pub use tile::BlackjackTiles;
