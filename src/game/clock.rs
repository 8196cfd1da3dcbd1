#[cfg(test)]
use std::cell::Cell;
use std::time::{Duration, SystemTime};

pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    origin: SystemTime,
    offset: Cell<Duration>,
}

#[cfg(test)]
impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(SystemTime::now())
    }
}

#[cfg(test)]
impl ManualClock {
    pub fn starting_at(origin: SystemTime) -> Self {
        Self {
            origin,
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.origin + self.offset.get()
    }
}
