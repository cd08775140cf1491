//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod dice;
pub mod events;
pub mod game;
pub mod rng;
pub mod state;

pub use dice::*;
pub use events::*;
pub use game::*;
pub use rng::*;
pub use state::*;
