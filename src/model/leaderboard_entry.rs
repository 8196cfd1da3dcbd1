use std::time::Duration;

use uuid::Uuid;

use super::Difficulty;

pub const DEFAULT_PLAYER_NAME: &str = "Player 1";

/// Result of the most recent finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    pub elapsed: Duration,
    pub difficulty: Difficulty,
    pub timestamp: i64,
    pub session_id: Uuid,
}

impl LeaderboardEntry {
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }

    pub fn time_label(&self) -> String {
        format!("{} sec", self.elapsed_seconds())
    }
}

/// Blank or whitespace-only names fall back to the default player.
pub fn normalize_player_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
