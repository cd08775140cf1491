#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub seed: u64,
    pub games: u32,
    /// Rolls allowed per game before it is abandoned.
    pub max_rolls: u32,
    pub record_steps: bool,
    pub save_timeout_ms: u64,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            games: 100,
            max_rolls: 200,
            record_steps: false,
            save_timeout_ms: 5_000,
        }
    }
}
