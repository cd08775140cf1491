use crate::{GameResultRecord, RecordError};
use std::sync::Mutex;

/// Append-only sink for completed games. Called from a background thread.
pub trait ResultRecorder: Send + Sync {
    fn record(&self, record: &GameResultRecord) -> Result<(), RecordError>;

    fn name(&self) -> &str;
}

/// Keeps records in memory. Used by tests and headless simulation.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<GameResultRecord>>,
    reject_with: Option<String>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses every write with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            reject_with: Some(reason.into()),
        }
    }

    pub fn records(&self) -> Vec<GameResultRecord> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ResultRecorder for MemoryRecorder {
    fn record(&self, record: &GameResultRecord) -> Result<(), RecordError> {
        if let Some(reason) = &self.reject_with {
            return Err(RecordError::Rejected(reason.clone()));
        }
        let mut guard = self
            .records
            .lock()
            .map_err(|err| RecordError::Io(err.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
