use std::time::{Duration, SystemTime};

/// Wall-clock span of one session. Rounds within a session share it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub started_timestamp: SystemTime,
    pub ended_timestamp: Option<SystemTime>,
}

impl TimerState {
    pub fn started_at(now: SystemTime) -> Self {
        Self {
            started_timestamp: now,
            ended_timestamp: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ended_timestamp.is_none()
    }

    /// Elapsed time up to `now`, or up to the end if the timer has stopped.
    pub fn elapsed_at(&self, now: SystemTime) -> Duration {
        self.ended_timestamp
            .unwrap_or(now)
            .duration_since(self.started_timestamp)
            .unwrap_or_default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(SystemTime::now())
    }

    pub fn ended(&self, now: SystemTime) -> TimerState {
        let mut new_state = self.clone();
        new_state.ended_timestamp = Some(now);
        new_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_while_running() {
        let now = SystemTime::now();
        let timer = TimerState::started_at(now);
        assert_eq!(timer.elapsed_at(now + Duration::from_secs(12)), Duration::from_secs(12));
    }

    #[test]
    fn test_elapsed_with_end() {
        let now = SystemTime::now();
        let timer = TimerState::started_at(now).ended(now + Duration::from_secs(10));

        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_at(now + Duration::from_secs(60)), Duration::from_secs(10));
    }

    #[test]
    fn test_clock_going_backwards_reads_as_zero() {
        let now = SystemTime::now();
        let timer = TimerState::started_at(now);
        assert_eq!(timer.elapsed_at(now - Duration::from_secs(3)), Duration::ZERO);
    }

    #[test]
    fn test_elapsed_running_real_clock() {
        let timer = TimerState::started_at(SystemTime::now() - Duration::from_secs(5));
        assert!(timer.elapsed() >= Duration::from_secs(5));
    }
}
