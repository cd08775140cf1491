use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CONFIG_ENV: &str = "TENZIES_CONFIG";
pub const SEED_ENV: &str = "TENZIES_SEED";
pub const RECORDS_ENV: &str = "TENZIES_RECORDS";
pub const LOG_ENV: &str = "TENZIES_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenziesConfig {
    pub seed: Option<u64>,
    pub records_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub log_filter: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    records_path: Option<PathBuf>,
    #[serde(default)]
    log_path: Option<PathBuf>,
    #[serde(default)]
    log_filter: Option<String>,
}

impl Default for TenziesConfig {
    fn default() -> Self {
        Self {
            seed: None,
            records_path: default_records_path(),
            log_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TenziesConfig {
    /// Defaults, then the config file, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        let path = env
            .get(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);
        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_file(&path)?;
        }
        config.apply_env(&env)?;
        Ok(config)
    }

    /// Merges a TOML file. A missing file leaves the config untouched.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }
        let body = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let file: ConfigFile = toml::from_str(&body).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        if file.seed.is_some() {
            self.seed = file.seed;
        }
        if let Some(records_path) = file.records_path {
            self.records_path = records_path;
        }
        if file.log_path.is_some() {
            self.log_path = file.log_path;
        }
        if let Some(filter) = file.log_filter {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(value) = env.get(SEED_ENV) {
            self.seed = Some(parse_seed(value)?);
        }
        if let Some(value) = env.get(RECORDS_ENV) {
            self.records_path = PathBuf::from(value);
        }
        if let Some(value) = env.get(LOG_ENV) {
            self.log_filter = value.clone();
        }
        Ok(())
    }
}

/// Accepts decimal or `0x`-prefixed hex.
pub fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| ConfigError::InvalidValue {
        key: SEED_ENV.to_string(),
        value: value.to_string(),
    })
}

/// Uses `seed` when given, otherwise derives one from the clock and pid.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        nanos ^ (u64::from(std::process::id()) << 32)
    })
}

pub fn tenzies_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".tenzies"))
}

pub fn default_config_path() -> Option<PathBuf> {
    tenzies_home().map(|dir| dir.join("config.toml"))
}

pub fn default_records_path() -> PathBuf {
    tenzies_home()
        .map(|dir| dir.join("results.jsonl"))
        .unwrap_or_else(|| PathBuf::from("tenzies_results.jsonl"))
}

pub fn default_log_path() -> PathBuf {
    tenzies_home()
        .map(|dir| dir.join("tenzies.log"))
        .unwrap_or_else(|| PathBuf::from("tenzies.log"))
}
