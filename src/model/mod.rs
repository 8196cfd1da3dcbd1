mod difficulty;
mod global_event;
mod leaderboard_entry;
mod sequence;
mod session_command;
mod session_event;
mod session_phase;
mod timer_state;

pub use difficulty::Difficulty;
pub use global_event::GlobalEvent;
pub use leaderboard_entry::{normalize_player_name, LeaderboardEntry, DEFAULT_PLAYER_NAME};
pub use sequence::{Sequence, DEFAULT_DIGITS, MAX_DIGITS};
pub use session_command::SessionCommand;
pub use session_event::{Notice, SessionEvent};
pub use session_phase::{RoundOutcome, SessionPhase};
pub use timer_state::TimerState;
