use crate::{
    plan_turn, AutoAction, AutoplayConfig, AutoplayError, AutoplayResult, GameStatus, GameTrace,
    StepRecord, SummaryStats,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tenzies_core::{Phase, RollOutcome};
use tenzies_session::{ResultRecorder, Session};

pub struct Simulator {
    session: Session,
    saved: u32,
}

impl Simulator {
    pub fn new(session: Session) -> Self {
        Self { session, saved: 0 }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns whether the action changed anything.
    pub fn apply_action(&mut self, action: &AutoAction) -> Result<bool, AutoplayError> {
        match action {
            AutoAction::Hold { index } => {
                if *index >= self.session.state().dice.len() {
                    return Err(AutoplayError::InvalidAction(action.short_label()));
                }
                Ok(self.session.hold_index(*index))
            }
            AutoAction::Roll => {
                if self.session.phase() == Phase::Won {
                    return Err(AutoplayError::InvalidAction(
                        "roll on a won game starts a new one".to_string(),
                    ));
                }
                Ok(matches!(
                    self.session.roll(),
                    RollOutcome::Rolled { resampled } if resampled > 0
                ))
            }
        }
    }

    /// Plays the current game until it is won or `max_rolls` is reached.
    pub fn play_game(&mut self, cfg: &AutoplayConfig) -> Result<GameTrace, AutoplayError> {
        let game = self.session.state().game;
        let mut steps = Vec::new();
        let status = loop {
            if self.session.phase() == Phase::Won {
                break GameStatus::Won;
            }
            if self.session.state().roll_count >= cfg.max_rolls {
                break GameStatus::MaxRolls;
            }
            let actions = plan_turn(&self.session.state().dice);
            for action in &actions {
                self.apply_action(action)?;
            }
            if cfg.record_steps {
                let state = self.session.state();
                steps.push(StepRecord {
                    roll: state.roll_count,
                    actions: actions.iter().map(AutoAction::short_label).collect(),
                    held: state.held_count(),
                    values: state.dice.iter().map(|die| die.value).collect(),
                });
            }
        };
        let state = self.session.state();
        Ok(GameTrace {
            game,
            status,
            rolls: state.roll_count,
            winning_value: state.winning_value(),
            steps,
        })
    }

    /// Moves on to a fresh game, through the same affordance a player uses.
    pub fn next_game(&mut self) {
        if self.session.phase() == Phase::Won {
            self.session.roll();
        } else {
            self.session.new_game();
        }
        let done = self.session.poll();
        self.saved += done.iter().filter(|outcome| outcome.is_saved()).count() as u32;
        self.session.drain_events();
    }

    /// Waits for outstanding writes and returns how many succeeded overall.
    pub fn finish(&mut self, timeout: Duration) -> u32 {
        let done = self.session.flush(timeout);
        self.saved += done.iter().filter(|outcome| outcome.is_saved()).count() as u32;
        self.saved
    }
}

pub fn run_autoplay(
    cfg: &AutoplayConfig,
    recorder: Arc<dyn ResultRecorder>,
) -> Result<AutoplayResult, AutoplayError> {
    let started = Instant::now();
    let mut sim = Simulator::new(Session::with_seed(cfg.seed, recorder));
    let mut games = Vec::with_capacity(cfg.games as usize);
    for idx in 0..cfg.games {
        if idx > 0 {
            sim.next_game();
        }
        let trace = sim.play_game(cfg)?;
        tracing::debug!(
            game = trace.game,
            rolls = trace.rolls,
            status = ?trace.status,
            "autoplay game finished"
        );
        games.push(trace);
    }
    let saved = sim.finish(Duration::from_millis(cfg.save_timeout_ms));
    let summary = SummaryStats::from_games(&games, saved, started.elapsed().as_millis() as u64);
    tracing::info!(
        games = summary.games,
        wins = summary.wins,
        saved = summary.saved,
        "autoplay finished"
    );
    Ok(AutoplayResult { games, summary })
}
