//! Core of a terminal worm game.
//!
//! A worm crawls through a bounded grid eating numbered targets. Eating a
//! target adds its value to the score and makes the worm grow by that many
//! segments over the following steps; running into a wall or into itself
//! ends the game. The crate knows nothing about terminals or keyboards: a
//! front-end drives [`GameState`] one step at a time and draws from the
//! [`StepOutcome`] each step returns.

pub mod error;
pub mod link;
pub mod state;
pub mod worm;

pub use error::GameError;
pub use state::{Direction, GameState, Phase, Rules, StepOutcome, Target};
pub use worm::Worm;

/// Grid position as `(x, y)`, with `y` growing downwards.
pub type Coords = (i32, i32);
