use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("record rejected: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for RecordError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {message}")]
    Io { path: String, message: String },
    #[error("parse config {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
