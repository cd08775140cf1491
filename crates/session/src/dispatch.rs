use crate::{GameResultRecord, RecordError, ResultRecorder};
use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tenzies_core::WinSummary;

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub game: u64,
    pub result: Result<(), String>,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs each record write as a one-shot background thread and collects the
/// outcomes over a channel. Writes are attempted once and never retried.
pub struct ResultDispatcher {
    recorder: Arc<dyn ResultRecorder>,
    tx: Sender<SaveOutcome>,
    rx: Receiver<SaveOutcome>,
    in_flight: usize,
}

impl ResultDispatcher {
    pub fn new(recorder: Arc<dyn ResultRecorder>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            recorder,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn recorder_name(&self) -> &str {
        self.recorder.name()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, summary: WinSummary) {
        let record = GameResultRecord::from_summary(&summary, Utc::now());
        let recorder = Arc::clone(&self.recorder);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tracing::debug!(game = summary.game, sink = recorder.name(), "dispatching game result");
        thread::spawn(move || {
            // A panicking sink still reports, so `in_flight` always drains.
            let result = panic::catch_unwind(AssertUnwindSafe(|| recorder.record(&record)))
                .unwrap_or_else(|_| Err(RecordError::Rejected("recorder panicked".into())))
                .map_err(|err| err.to_string());
            match &result {
                Ok(()) => tracing::info!(
                    game = summary.game,
                    roll_count = record.roll_count,
                    winning_value = record.winning_value,
                    "game result saved"
                ),
                Err(err) => tracing::error!(
                    game = summary.game,
                    roll_count = record.roll_count,
                    winning_value = record.winning_value,
                    error = %err,
                    "failed to save game result"
                ),
            }
            let _ = tx.send(SaveOutcome {
                game: summary.game,
                result,
            });
        });
    }

    /// Collects every completed write without blocking.
    pub fn poll(&mut self) -> Vec<SaveOutcome> {
        let mut done = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            done.push(outcome);
        }
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Blocks until every in-flight write has reported or `timeout` passes.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<SaveOutcome> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.in_flight > done.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => done.push(outcome),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        pending = self.in_flight - done.len(),
                        "timed out waiting for result writes"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }
}
