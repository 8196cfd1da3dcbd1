use std::time::Duration;

use crate::game::scheduler::{Scheduler, Task};

/// Schedules tasks on the GLib main loop.
#[derive(Debug, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) {
        let _source_id = glib::timeout_add_local_once(delay, task);
    }
}
