use super::Difficulty;

/// Everything that can drive a session forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start(Difficulty),
    HideSequence { round: u64 },
    Submit(Vec<String>),
    /// The player dismissed the correct-answer notice.
    ContinueRound,
    ChangeDifficulty(Difficulty),
    SetPlayerName(String),
}
