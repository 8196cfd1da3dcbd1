use crate::events::EventHandler;
use crate::model::{LeaderboardEntry, SessionEvent};

/// Keeps only the result of the most recent game over.
#[derive(Debug, Default)]
pub struct Leaderboard {
    latest: Option<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: LeaderboardEntry) {
        log::trace!(target: "leaderboard", "Replacing leaderboard row with {:?}", entry);
        self.latest = Some(entry);
    }

    pub fn latest(&self) -> Option<&LeaderboardEntry> {
        self.latest.as_ref()
    }
}

impl EventHandler<SessionEvent> for Leaderboard {
    fn handle_event(&mut self, event: &SessionEvent) {
        if let SessionEvent::LeaderboardUpdated(entry) = event {
            self.record(entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, SessionPhase};
    use std::time::Duration;
    use uuid::Uuid;

    fn entry(player_name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: player_name.to_string(),
            score,
            elapsed: Duration::from_secs(3),
            difficulty: Difficulty::Medium,
            timestamp: 0,
            session_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_empty_until_first_game_over() {
        let mut leaderboard = Leaderboard::new();
        leaderboard.handle_event(&SessionEvent::PhaseChanged(SessionPhase::Idle));
        assert!(leaderboard.latest().is_none());
    }

    #[test]
    fn test_latest_entry_overwrites_previous_even_if_lower() {
        let mut leaderboard = Leaderboard::new();
        leaderboard.handle_event(&SessionEvent::LeaderboardUpdated(entry("Ada", 50)));
        leaderboard.handle_event(&SessionEvent::LeaderboardUpdated(entry("Ada", 0)));

        let latest = leaderboard.latest().unwrap();
        assert_eq!(latest.score, 0);
    }
}
