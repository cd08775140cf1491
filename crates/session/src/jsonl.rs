use crate::{GameResultRecord, RecordError, ResultRecorder};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends one JSON document per line to a file.
#[derive(Debug)]
pub struct JsonlRecorder {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultRecorder for JsonlRecorder {
    fn record(&self, record: &GameResultRecord) -> Result<(), RecordError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let _guard = self
            .write_lock
            .lock()
            .map_err(|err| RecordError::Io(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

/// Reads every record back. A missing file yields no records.
pub fn load_records(path: &Path) -> Result<Vec<GameResultRecord>, RecordError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let body = fs::read_to_string(path)?;
    let mut records = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(serde_json::from_str(line)?);
    }
    Ok(records)
}
