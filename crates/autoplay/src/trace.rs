use crate::AutoplayError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Won,
    MaxRolls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub roll: u32,
    pub actions: Vec<String>,
    pub held: usize,
    pub values: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTrace {
    pub game: u64,
    pub status: GameStatus,
    pub rolls: u32,
    pub winning_value: Option<u8>,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub games: u32,
    pub wins: u32,
    pub saved: u32,
    pub min_rolls: Option<u32>,
    pub max_rolls: Option<u32>,
    pub mean_rolls: Option<f64>,
    pub wall_time_ms: u64,
}

impl SummaryStats {
    /// Roll statistics cover won games only.
    pub fn from_games(games: &[GameTrace], saved: u32, wall_time_ms: u64) -> Self {
        let won: Vec<u32> = games
            .iter()
            .filter(|trace| trace.status == GameStatus::Won)
            .map(|trace| trace.rolls)
            .collect();
        let mean_rolls = if won.is_empty() {
            None
        } else {
            Some(won.iter().map(|rolls| f64::from(*rolls)).sum::<f64>() / won.len() as f64)
        };
        Self {
            games: games.len() as u32,
            wins: won.len() as u32,
            saved,
            min_rolls: won.iter().copied().min(),
            max_rolls: won.iter().copied().max(),
            mean_rolls,
            wall_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoplayResult {
    pub games: Vec<GameTrace>,
    pub summary: SummaryStats,
}

impl AutoplayResult {
    pub fn to_text_report(&self) -> String {
        let summary = &self.summary;
        let mut lines = vec![
            format!(
                "summary: games={} wins={} saved={} wall_ms={}",
                summary.games, summary.wins, summary.saved, summary.wall_time_ms
            ),
            format!(
                "rolls: min={} max={} mean={}",
                optional(summary.min_rolls),
                optional(summary.max_rolls),
                summary
                    .mean_rolls
                    .map(|mean| format!("{mean:.2}"))
                    .unwrap_or_else(|| "-".to_string())
            ),
            String::new(),
            "games:".to_string(),
        ];
        for trace in &self.games {
            lines.push(format!(
                "  game {:>4} | {:<8} | rolls {:>3} | value {}",
                trace.game,
                status_label(trace.status),
                trace.rolls,
                optional(trace.winning_value)
            ));
            for step in &trace.steps {
                lines.push(format!(
                    "    roll {:>3} held {:>2} {:?} [{}]",
                    step.roll,
                    step.held,
                    step.values,
                    step.actions.join(", ")
                ));
            }
        }
        lines.join("\n")
    }

    pub fn write_json(&self, path: &Path) -> Result<(), AutoplayError> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body)?;
        Ok(())
    }
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Won => "won",
        GameStatus::MaxRolls => "abandoned",
    }
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string())
}
