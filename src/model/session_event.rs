use std::time::Duration;

use super::{Difficulty, LeaderboardEntry, Sequence, SessionPhase, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Correct,
    Incorrect,
    GameOver,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Correct => "Correct Sequence! Next sequence coming up...",
            Notice::Incorrect => "Incorrect Sequence! Try again.",
            Notice::GameOver => "Game Over! Check the leaderboard.",
        }
    }
}

/// View effects produced by the session, in the order they should be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DisplaySequence(Sequence),
    ClearSequence,
    ScoreChanged(u32),
    Notice(Notice),
    LeaderboardUpdated(LeaderboardEntry),
    PhaseChanged(SessionPhase),
    StartEnabled(bool),
    InputFieldsChanged {
        difficulty: Difficulty,
        count: usize,
    },
    TimerStateChanged(TimerState),
    ScheduleHide {
        round: u64,
        after: Duration,
    },
}
