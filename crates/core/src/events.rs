use crate::DieId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GameStarted { game: u64 },
    DiceRolled { roll_count: u32, resampled: usize },
    DieHeld { id: DieId, held: bool },
    GameWon {
        game: u64,
        roll_count: u32,
        winning_value: u8,
    },
    ResultSaved { game: u64 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
