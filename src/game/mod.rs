pub mod clock;
pub mod leaderboard;
pub mod scheduler;
pub mod session;
pub mod session_engine;
pub mod settings;

pub use clock::{Clock, SystemClock};
pub use leaderboard::Leaderboard;
pub use scheduler::Scheduler;
pub use session::{GameSession, SessionConfig};
pub use session_engine::SessionEngine;
