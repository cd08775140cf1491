use crate::{ResultDispatcher, ResultRecorder, SaveOutcome};
use std::sync::Arc;
use std::time::Duration;
use tenzies_core::{DieId, Event, EventBus, Game, GameError, GameState, Phase, RollOutcome};

/// The game controller bound to a result sink. Every entry point runs the
/// corresponding game transition, then hands a freshly latched win to the
/// dispatcher.
pub struct Session {
    game: Game,
    events: EventBus,
    dispatcher: ResultDispatcher,
    saves_attempted: u64,
}

impl Session {
    pub fn new(game: Game, recorder: Arc<dyn ResultRecorder>) -> Self {
        Self::assemble(game, EventBus::default(), recorder)
    }

    /// Resumes from a saved state. A state whose dice already win reports
    /// `GameWon` and records once, like a win reached through play.
    pub fn restore(
        state: GameState,
        seed: u64,
        recorder: Arc<dyn ResultRecorder>,
    ) -> Result<Self, GameError> {
        let mut events = EventBus::default();
        let game = Game::from_state(state, seed, &mut events)?;
        Ok(Self::assemble(game, events, recorder))
    }

    fn assemble(game: Game, events: EventBus, recorder: Arc<dyn ResultRecorder>) -> Self {
        let mut session = Self {
            game,
            events,
            dispatcher: ResultDispatcher::new(recorder),
            saves_attempted: 0,
        };
        session.flush_win();
        session
    }

    pub fn with_seed(seed: u64, recorder: Arc<dyn ResultRecorder>) -> Self {
        let mut session = Self::new(Game::new(seed), recorder);
        let game = session.game.state().game;
        session.events.push(Event::GameStarted { game });
        session
    }

    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    pub fn phase(&self) -> Phase {
        self.game.state().phase()
    }

    pub fn seed(&self) -> u64 {
        self.game.seed()
    }

    pub fn saves_attempted(&self) -> u64 {
        self.saves_attempted
    }

    pub fn pending_saves(&self) -> usize {
        self.dispatcher.in_flight()
    }

    pub fn recorder_name(&self) -> &str {
        self.dispatcher.recorder_name()
    }

    /// Label for the primary action in the current phase.
    pub fn primary_label(&self) -> &'static str {
        match self.phase() {
            Phase::Rolling => "Roll",
            Phase::Won => "New Game",
        }
    }

    pub fn roll(&mut self) -> RollOutcome {
        let outcome = self.game.roll(&mut self.events);
        self.flush_win();
        outcome
    }

    pub fn hold(&mut self, id: DieId) -> bool {
        let changed = self.game.hold(id, &mut self.events);
        self.flush_win();
        changed
    }

    pub fn hold_index(&mut self, index: usize) -> bool {
        let changed = self.game.hold_index(index, &mut self.events);
        self.flush_win();
        changed
    }

    pub fn new_game(&mut self) {
        self.game.new_game(&mut self.events);
    }

    /// Applies finished writes to the game. Failed writes are only logged.
    pub fn poll(&mut self) -> Vec<SaveOutcome> {
        let done = self.dispatcher.poll();
        self.apply_outcomes(&done);
        done
    }

    /// Like `poll`, but waits up to `timeout` for in-flight writes.
    pub fn flush(&mut self, timeout: Duration) -> Vec<SaveOutcome> {
        let done = self.dispatcher.wait_idle(timeout);
        self.apply_outcomes(&done);
        done
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }

    fn apply_outcomes(&mut self, done: &[SaveOutcome]) {
        for outcome in done.iter().filter(|outcome| outcome.is_saved()) {
            if !self.game.mark_result_saved(outcome.game, &mut self.events) {
                tracing::debug!(game = outcome.game, "save finished after game was replaced");
            }
        }
    }

    fn flush_win(&mut self) {
        if let Some(summary) = self.game.take_win() {
            self.saves_attempted += 1;
            self.dispatcher.dispatch(summary);
        }
    }
}
