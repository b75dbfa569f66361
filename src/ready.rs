//! # Ready-Queue / Priority Selector
//!
//! Decides which registered task runs next. There is no separate queue
//! structure; selection is a single O(n) scan over the store.
//!
//! ## Selection Rule
//!
//! 1. Only tasks with `next_wake` at or before `now` are candidates
//! 2. The candidate with the highest priority wins
//! 3. Equal priorities go to the lowest id (earliest registration)
//!
//! ## Starvation
//!
//! Every dispatch moves the winner's `next_wake` forward by its period, so
//! once each higher-priority due task has run, lower-priority due tasks
//! become the best candidate in turn.

use crate::task::{TaskControlBlock, TaskId};
use crate::tick::Tick;
use crate::store::TaskStore;

impl<'a, const N: usize> TaskStore<'a, N> {
    /// Select the task to dispatch at `now`, if any is due.
    pub fn select_ready(&self, now: Tick) -> Option<TaskId> {
        let mut best: Option<&TaskControlBlock<'a>> = None;

        for tcb in self.iter().filter(|t| t.is_due(now)) {
            // Strictly greater: ties keep the earlier registration.
            match best {
                Some(b) if tcb.priority() <= b.priority() => {}
                _ => best = Some(tcb),
            }
        }

        best.map(TaskControlBlock::id)
    }

    /// Earliest upcoming release among all tasks.
    ///
    /// Ticks are compared wraparound-safe. Returns `None` for an empty store.
    pub fn next_release(&self) -> Option<Tick> {
        self.iter()
            .map(TaskControlBlock::next_wake)
            .reduce(|a, b| if b.is_before(a) { b } else { a })
    }

    /// Number of tasks released at or before `now`.
    pub fn ready_count(&self, now: Tick) -> usize {
        self.iter().filter(|t| t.is_due(now)).count()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::store::TaskStore;
    use crate::task::{Priority, TaskConfig, TaskId};
    use crate::tick::Tick;

    fn noop() {}

    #[test]
    fn test_empty_store_selects_nothing() {
        let store: TaskStore<'_, 4> = TaskStore::new();
        assert_eq!(store.select_ready(Tick(0)), None);
        assert_eq!(store.next_release(), None);
    }

    #[test]
    fn test_highest_priority_due_task_wins() {
        let (mut a, mut b, mut c) = (noop, noop, noop);
        let mut store: TaskStore<'_, 4> = TaskStore::new();
        store.register(Priority(1), 200, &mut a).unwrap();
        store.register(Priority(3), 1000, &mut b).unwrap();
        store.register(Priority(2), 500, &mut c).unwrap();

        assert_eq!(store.select_ready(Tick(0)), Some(TaskId(1)));
        assert_eq!(store.ready_count(Tick(0)), 3);
    }

    #[test]
    fn test_tie_goes_to_earlier_registration() {
        let (mut a, mut b, mut c) = (noop, noop, noop);
        let mut store: TaskStore<'_, 4> = TaskStore::new();
        store.register(Priority(1), 10, &mut a).unwrap();
        store.register(Priority(5), 10, &mut b).unwrap();
        store.register(Priority(5), 10, &mut c).unwrap();

        assert_eq!(store.select_ready(Tick(0)), Some(TaskId(1)));
    }

    #[test]
    fn test_future_tasks_are_not_selected() {
        let (mut a, mut b) = (noop, noop);
        let mut store: TaskStore<'_, 4> = TaskStore::new();
        store
            .create(TaskConfig::new(Priority(9), 10).first_release(Tick(50)), &mut a)
            .unwrap();
        store
            .create(TaskConfig::new(Priority(1), 10).first_release(Tick(20)), &mut b)
            .unwrap();

        assert_eq!(store.select_ready(Tick(19)), None);
        assert_eq!(store.select_ready(Tick(20)), Some(TaskId(1)));
        assert_eq!(store.select_ready(Tick(50)), Some(TaskId(0)));
        assert_eq!(store.next_release(), Some(Tick(20)));
    }

    #[test]
    fn test_selection_across_wraparound() {
        let (mut a, mut b) = (noop, noop);
        let mut store: TaskStore<'_, 4> = TaskStore::new();
        // Released just before the counter wraps.
        store
            .create(TaskConfig::new(Priority(1), 10).first_release(Tick(u32::MAX - 1)), &mut a)
            .unwrap();
        // Released just after.
        store
            .create(TaskConfig::new(Priority(2), 10).first_release(Tick(3)), &mut b)
            .unwrap();

        assert_eq!(store.next_release(), Some(Tick(u32::MAX - 1)));
        assert_eq!(store.select_ready(Tick(u32::MAX)), Some(TaskId(0)));
        assert_eq!(store.select_ready(Tick(3)), Some(TaskId(1)));
    }
}
