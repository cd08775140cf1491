use crate::{
    derive_won, Die, DieId, Event, EventBus, GameState, RngState, WinSummary, DICE_COUNT,
    DIE_FACES,
};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("wrong dice count: {0}")]
    DiceCount(usize),
    #[error("die {0} has invalid face {1}")]
    InvalidFace(DieId, u8),
    #[error("die id {0} appears more than once")]
    DuplicateId(DieId),
    #[error("game marked won but the dice are not all held and equal")]
    WonWithoutWinningDice,
    #[error("result marked saved on a game that is not won")]
    SavedWithoutWin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    Rolled { resampled: usize },
    Reset,
}

/// Owns the dice and the win/save flags. All mutation goes through here.
#[derive(Debug)]
pub struct Game {
    rng: RngState,
    state: GameState,
    next_die_id: u32,
    pending_win: Option<WinSummary>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: RngState::from_seed(seed),
            state: GameState {
                game: 0,
                dice: Vec::with_capacity(DICE_COUNT),
                roll_count: 0,
                game_won: false,
                result_saved: false,
            },
            next_die_id: 0,
            pending_win: None,
        };
        game.reset();
        game
    }

    /// Wraps an existing state. The win check runs immediately against
    /// `events`, so a state that is already all-held-and-equal latches its
    /// win and reports `GameWon` here.
    pub fn from_state(
        state: GameState,
        seed: u64,
        events: &mut EventBus,
    ) -> Result<Self, GameError> {
        if state.dice.len() != DICE_COUNT {
            return Err(GameError::DiceCount(state.dice.len()));
        }
        if let Some(die) = state
            .dice
            .iter()
            .find(|die| !(1..=DIE_FACES).contains(&die.value))
        {
            return Err(GameError::InvalidFace(die.id, die.value));
        }
        let mut seen = HashSet::with_capacity(DICE_COUNT);
        if let Some(die) = state.dice.iter().find(|die| !seen.insert(die.id)) {
            return Err(GameError::DuplicateId(die.id));
        }
        if state.game_won && !derive_won(&state.dice) {
            return Err(GameError::WonWithoutWinningDice);
        }
        if state.result_saved && !state.game_won {
            return Err(GameError::SavedWithoutWin);
        }
        let next_die_id = state
            .dice
            .iter()
            .map(|die| die.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        let mut game = Self {
            rng: RngState::from_seed(seed),
            state,
            next_die_id,
            pending_win: None,
        };
        game.check_win(events);
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn dice(&self) -> &[Die] {
        &self.state.dice
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn new_game(&mut self, events: &mut EventBus) {
        self.reset();
        events.push(Event::GameStarted {
            game: self.state.game,
        });
    }

    /// Resamples unheld dice, or starts a new game when the current one is won.
    pub fn roll(&mut self, events: &mut EventBus) -> RollOutcome {
        if self.state.game_won {
            self.new_game(events);
            return RollOutcome::Reset;
        }
        let mut resampled = 0;
        for die in self.state.dice.iter_mut().filter(|die| !die.held) {
            die.value = self.rng.roll_face();
            resampled += 1;
        }
        self.state.roll_count += 1;
        events.push(Event::DiceRolled {
            roll_count: self.state.roll_count,
            resampled,
        });
        self.check_win(events);
        RollOutcome::Rolled { resampled }
    }

    /// Flips the hold flag on the die with `id`. Returns false when nothing
    /// changed: unknown id, or the game is already won.
    pub fn hold(&mut self, id: DieId, events: &mut EventBus) -> bool {
        if self.state.game_won {
            return false;
        }
        let Some(die) = self.state.dice.iter_mut().find(|die| die.id == id) else {
            return false;
        };
        die.toggle_hold();
        events.push(Event::DieHeld { id, held: die.held });
        self.check_win(events);
        true
    }

    pub fn hold_index(&mut self, index: usize, events: &mut EventBus) -> bool {
        match self.state.dice.get(index) {
            Some(die) => {
                let id = die.id;
                self.hold(id, events)
            }
            None => false,
        }
    }

    /// Edge-triggered win derivation. Returns the summary only on the
    /// transition into won; later calls return `None` until the next game.
    pub fn check_win(&mut self, events: &mut EventBus) -> Option<WinSummary> {
        if self.state.game_won || !derive_won(&self.state.dice) {
            return None;
        }
        self.state.game_won = true;
        let summary = WinSummary {
            game: self.state.game,
            dice_count: self.state.dice.len(),
            roll_count: self.state.roll_count,
            winning_value: self.state.dice[0].value,
        };
        self.pending_win = Some(summary);
        events.push(Event::GameWon {
            game: summary.game,
            roll_count: summary.roll_count,
            winning_value: summary.winning_value,
        });
        Some(summary)
    }

    /// Consumes the latched win, if any. Yields at most once per game.
    pub fn take_win(&mut self) -> Option<WinSummary> {
        self.pending_win.take()
    }

    /// Marks the result of `game` as saved. Completions for an earlier game
    /// are ignored.
    pub fn mark_result_saved(&mut self, game: u64, events: &mut EventBus) -> bool {
        if game != self.state.game || !self.state.game_won || self.state.result_saved {
            return false;
        }
        self.state.result_saved = true;
        events.push(Event::ResultSaved { game });
        true
    }

    fn reset(&mut self) {
        let mut dice = Vec::with_capacity(DICE_COUNT);
        for _ in 0..DICE_COUNT {
            let id = DieId(self.next_die_id);
            self.next_die_id = self.next_die_id.wrapping_add(1);
            dice.push(Die::new(id, self.rng.roll_face()));
        }
        self.state = GameState {
            game: self.state.game + 1,
            dice,
            roll_count: 0,
            game_won: false,
            result_saved: false,
        };
        self.pending_win = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn won_state(value: u8, roll_count: u32) -> GameState {
        GameState {
            game: 3,
            dice: (0..DICE_COUNT as u32)
                .map(|idx| Die {
                    id: DieId(idx),
                    value,
                    held: true,
                })
                .collect(),
            roll_count,
            game_won: false,
            result_saved: false,
        }
    }

    #[test]
    fn new_game_deals_ten_unheld_dice() {
        let game = Game::new(1);
        assert_eq!(game.dice().len(), DICE_COUNT);
        assert!(game.dice().iter().all(|die| !die.held));
        assert_eq!(game.state().roll_count, 0);
        assert_eq!(game.state().game, 1);
    }

    #[test]
    fn from_state_latches_existing_win() {
        let mut events = EventBus::default();
        let mut game = Game::from_state(won_state(4, 7), 9, &mut events).expect("state");
        assert!(game.state().game_won);
        let summary = game.take_win().expect("win");
        assert_eq!(summary.winning_value, 4);
        assert_eq!(summary.roll_count, 7);
        assert_eq!(summary.dice_count, DICE_COUNT);
        assert_eq!(game.take_win(), None);
        let drained: Vec<Event> = events.drain().collect();
        assert_eq!(
            drained,
            vec![Event::GameWon {
                game: 3,
                roll_count: 7,
                winning_value: 4
            }]
        );
    }

    #[test]
    fn from_state_rejects_bad_shapes() {
        let reject = |state: GameState| {
            let mut events = EventBus::default();
            let err = Game::from_state(state, 0, &mut events).unwrap_err();
            assert!(events.is_empty());
            err
        };

        let mut short = won_state(2, 0);
        short.dice.pop();
        assert_eq!(reject(short), GameError::DiceCount(DICE_COUNT - 1));

        let mut bad_face = won_state(2, 0);
        bad_face.dice[5].value = 7;
        assert_eq!(reject(bad_face), GameError::InvalidFace(DieId(5), 7));

        let mut saved = won_state(2, 0);
        saved.dice[0].held = false;
        saved.result_saved = true;
        assert_eq!(reject(saved), GameError::SavedWithoutWin);

        let mut won_flag = won_state(2, 0);
        for (idx, die) in won_flag.dice.iter_mut().enumerate() {
            die.value = (idx % 6) as u8 + 1;
            die.held = false;
        }
        won_flag.game_won = true;
        won_flag.result_saved = true;
        assert_eq!(reject(won_flag), GameError::WonWithoutWinningDice);

        let mut shared_ids = won_state(2, 0);
        for die in shared_ids.dice.iter_mut() {
            die.id = DieId(0);
        }
        assert_eq!(reject(shared_ids), GameError::DuplicateId(DieId(0)));
    }

    #[test]
    fn from_state_accepts_consistent_won_flag() {
        let mut state = won_state(5, 4);
        state.game_won = true;
        state.result_saved = true;
        let mut events = EventBus::default();
        let mut game = Game::from_state(state, 0, &mut events).expect("state");
        assert!(game.state().game_won);
        assert_eq!(game.take_win(), None);
        assert!(events.is_empty());
    }

    #[test]
    fn ids_stay_unique_across_resets() {
        let mut game = Game::new(5);
        let mut events = EventBus::default();
        let first: Vec<DieId> = game.dice().iter().map(|die| die.id).collect();
        game.new_game(&mut events);
        assert!(game.dice().iter().all(|die| !first.contains(&die.id)));
    }

    #[test]
    fn hold_ignored_once_won() {
        let mut game =
            Game::from_state(won_state(6, 2), 0, &mut EventBus::default()).expect("state");
        let mut events = EventBus::default();
        assert!(!game.hold(DieId(0), &mut events));
        assert!(game.dice()[0].held);
        assert!(game.state().game_won);
        assert!(events.is_empty());
    }

    #[test]
    fn mark_saved_only_for_current_won_game() {
        let mut game =
            Game::from_state(won_state(1, 0), 0, &mut EventBus::default()).expect("state");
        let mut events = EventBus::default();
        assert!(!game.mark_result_saved(2, &mut events));
        assert!(game.mark_result_saved(3, &mut events));
        assert!(!game.mark_result_saved(3, &mut events));
        assert!(game.state().result_saved);
        let drained: Vec<Event> = events.drain().collect();
        assert_eq!(drained, vec![Event::ResultSaved { game: 3 }]);
    }
}
