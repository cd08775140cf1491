use crate::Die;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Rolling,
    Won,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    /// Generation number, bumped on every new game.
    pub game: u64,
    pub dice: Vec<Die>,
    pub roll_count: u32,
    pub game_won: bool,
    pub result_saved: bool,
}

impl GameState {
    pub fn phase(&self) -> Phase {
        if self.game_won {
            Phase::Won
        } else {
            Phase::Rolling
        }
    }

    pub fn winning_value(&self) -> Option<u8> {
        if self.game_won {
            self.dice.first().map(|die| die.value)
        } else {
            None
        }
    }

    pub fn held_count(&self) -> usize {
        self.dice.iter().filter(|die| die.held).count()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinSummary {
    pub game: u64,
    pub dice_count: usize,
    pub roll_count: u32,
    pub winning_value: u8,
}
