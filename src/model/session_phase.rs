#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Sequence is visible; input is not accepted yet.
    Showing,
    /// Sequence hidden; waiting for the player's answers.
    Awaiting,
    /// Round won; the next sequence waits until the correct notice is dismissed.
    Advancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Correct,
    Incorrect,
}
