//! Deferred tasks on the single-threaded tick scheduler.
//!
//! Timed side effects such as discovery respawns are queued here and
//! released by the owning engine when its tick observes that they are due.
//! Nothing fires on its own, so clearing the scheduler on teardown leaves
//! no detached timers behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    id: TaskId,
    due: DateTime<Utc>,
    task: T,
}

/// Ordered queue of tasks keyed by due time.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u64,
    // Sorted by (due, id); equal due times keep insertion order.
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Queues `task` to become due at `due`.
    pub fn schedule_at(&mut self, due: DateTime<Utc>, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let index = self.tasks.partition_point(|t| t.due <= due);
        self.tasks.insert(index, ScheduledTask { id, due, task });
        id
    }

    /// Cancels a pending task. Returns `false` if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Removes and returns every task due at or before `now`, in due order.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<T> {
        let split = self.tasks.partition_point(|t| t.due <= now);
        self.tasks.drain(..split).map(|t| t.task).collect()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.tasks.first().map(|t| t.due)
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_drain_due_returns_only_due_tasks_in_order() {
        // Arrange
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(t0() + Duration::seconds(3), "late");
        scheduler.schedule_at(t0() + Duration::seconds(1), "early");
        scheduler.schedule_at(t0() + Duration::seconds(1), "early-second");

        // Act
        let due = scheduler.drain_due(t0() + Duration::seconds(2));

        // Assert
        assert_eq!(due, vec!["early", "early-second"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(t0() + Duration::seconds(3)));
    }

    #[test]
    fn test_cancel_removes_pending_task() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_at(t0(), 1);

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.drain_due(t0()).is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(t0(), 1);
        scheduler.schedule_at(t0(), 2);

        scheduler.clear();

        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_due(), None);
    }
}
