use std::collections::VecDeque;
use std::time::Duration;
use tenzies_core::{Die, Event, Phase, RollOutcome, DICE_COUNT};
use tenzies_session::Session;

pub const DICE_PER_ROW: usize = 5;
const MAX_EVENT_LOG: usize = 200;

pub struct App {
    pub session: Session,
    pub cursor: usize,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(session: Session) -> Self {
        let mut app = Self {
            session,
            cursor: 0,
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            should_quit: false,
        };
        app.push_event_line(format!("seed {}", app.session.seed()));
        app.flush_events();
        app
    }

    /// Picks up finished result writes. Their outcome is not shown to the player.
    pub fn on_tick(&mut self) {
        self.session.poll();
        self.flush_events();
    }

    pub fn shutdown(&mut self, wait: Duration) {
        if self.session.pending_saves() > 0 {
            self.session.flush(wait);
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.session.state().dice
    }

    pub fn is_won(&self) -> bool {
        self.session.phase() == Phase::Won
    }

    pub fn primary_label(&self) -> &'static str {
        self.session.primary_label()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.dice().len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    pub fn move_row(&mut self, down: bool) {
        let len = self.dice().len();
        let target = if down {
            self.cursor + DICE_PER_ROW
        } else {
            self.cursor.wrapping_sub(DICE_PER_ROW)
        };
        if target < len {
            self.cursor = target;
        }
    }

    pub fn hold_cursor(&mut self) {
        self.hold_index(self.cursor);
    }

    pub fn hold_index(&mut self, index: usize) {
        if index >= DICE_COUNT {
            return;
        }
        self.cursor = index;
        if self.is_won() {
            self.push_status("game won; press Enter for a new game");
            return;
        }
        if self.session.hold_index(index) {
            let held = self.dice()[index].held;
            self.push_status(format!(
                "die {} {}",
                index + 1,
                if held { "held" } else { "released" }
            ));
        }
        self.flush_events();
    }

    pub fn roll(&mut self) {
        match self.session.roll() {
            RollOutcome::Rolled { resampled } => {
                self.push_status(format!("rolled {resampled} dice"));
            }
            RollOutcome::Reset => {
                self.cursor = 0;
                self.push_status("new game");
            }
        }
        self.flush_events();
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    fn flush_events(&mut self) {
        let events = self.session.drain_events();
        for event in events {
            if let Some(line) = format_event(&event) {
                self.push_event_line(line);
            }
        }
    }

    fn push_event_line(&mut self, line: String) {
        self.event_log.push_front(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_back();
        }
    }
}

fn format_event(event: &Event) -> Option<String> {
    let line = match event {
        Event::GameStarted { game } => format!("game {game} started"),
        Event::DiceRolled {
            roll_count,
            resampled,
        } => format!("roll {roll_count}: {resampled} dice rerolled"),
        Event::DieHeld { id, held } => {
            format!("{id} {}", if *held { "held" } else { "released" })
        }
        Event::GameWon {
            roll_count,
            winning_value,
            ..
        } => format!("won with all {winning_value}s after {roll_count} rolls"),
        // Persistence stays invisible to the player.
        Event::ResultSaved { .. } => return None,
    };
    Some(line)
}
