//! Virtual-clock timer queue
//!
//! The host owns time: nothing fires until [`TimerQueue::pop_due`] is asked
//! for tasks up to some instant.

use crate::dom::NodeId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Deferred page work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Start fading out a flash message
    FadeFlash(NodeId),
    /// Drop a faded flash message
    RemoveFlash(NodeId),
    /// Put a cart button's label back
    RestoreCartLabel(NodeId),
}

#[derive(Debug, Default, Clone)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    /// Keyed by deadline, then scheduling order
    pending: BTreeMap<(Duration, u64), TimerTask>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the page loaded
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: TimerTask) {
        let key = (self.now + delay, self.next_seq);
        self.next_seq += 1;
        self.pending.insert(key, task);
    }

    /// Take the earliest task due at or before `until`, moving the clock to
    /// its deadline
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerTask> {
        let (&(deadline, _), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }
        let ((deadline, _), task) = self.pending.pop_first()?;
        self.now = self.now.max(deadline);
        Some(task)
    }

    /// Move the clock forward; never moves backwards
    pub fn advance_to(&mut self, instant: Duration) {
        self.now = self.now.max(instant);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_pop_in_deadline_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(Duration::from_millis(500), TimerTask::RemoveFlash(NodeId(1)));
        timers.schedule(Duration::from_millis(100), TimerTask::FadeFlash(NodeId(2)));
        timers.schedule(Duration::from_millis(100), TimerTask::FadeFlash(NodeId(3)));

        let until = Duration::from_millis(200);
        assert_eq!(timers.pop_due(until), Some(TimerTask::FadeFlash(NodeId(2))));
        assert_eq!(timers.pop_due(until), Some(TimerTask::FadeFlash(NodeId(3))));
        assert_eq!(timers.now(), Duration::from_millis(100));
        assert_eq!(timers.pop_due(until), None);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut timers = TimerQueue::new();
        timers.advance_to(Duration::from_secs(5));
        timers.schedule(Duration::from_millis(500), TimerTask::RemoveFlash(NodeId(1)));

        assert_eq!(timers.pop_due(Duration::from_millis(5499)), None);
        assert!(timers.pop_due(Duration::from_millis(5500)).is_some());
    }
}
