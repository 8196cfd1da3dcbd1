#[cfg(test)]
use std::cell::RefCell;
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// Runs a callback once, later, on the same thread.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, task: Task);
}

/// Holds tasks until the owner decides time has passed.
#[cfg(test)]
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Vec<(Duration, Task)>>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_delays(&self) -> Vec<Duration> {
        self.pending.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    /// Runs every task queued so far. Tasks queued while running wait for the next call.
    pub fn fire_all(&self) -> usize {
        let tasks: Vec<(Duration, Task)> = self.pending.borrow_mut().drain(..).collect();
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) {
        self.pending.borrow_mut().push((delay, task));
    }
}
