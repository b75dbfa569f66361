//! # Scheduler
//!
//! The control loop of TickOS. Owns the task store, the clock and the event
//! sink, and repeatedly dispatches the highest-priority due task.
//!
//! ## Scheduling Algorithm
//!
//! Each iteration (`step()`):
//! 1. **Wake**: read `now()`, move every due Dormant task to Ready
//! 2. **Select**: `select_ready(now)`: highest priority, ties by id
//! 3. **Dispatch**: mark the task Running and invoke its entry once
//! 4. **Account**: read `now()` again; a completion strictly after
//!    `next_wake + period` is a missed deadline. Advance
//!    `next_wake += period` (delay-until) and emit one event
//! 5. **Idle**: if nothing was due, sleep in `wait_until(next_release)`
//!
//! ```text
//!              ┌──────────┐  select_ready()  ┌─────────────┐
//!     ┌──────► │   Idle   │ ───────────────► │ Dispatching │
//!     │        └──────────┘                  └─────────────┘
//!     │             ▲  nothing due: wait_until()    │ task selected
//!     │             └───────────────────────────────┤
//!     │                                             ▼
//!     │          entry returned             ┌─────────────┐
//!     └──────────────────────────────────── │ TaskRunning │
//!                                           └─────────────┘
//! ```
//!
//! ## Failure Semantics
//!
//! Missed deadlines are counted and reported through the event sink; the
//! loop carries on with the next due task. The only fatal condition is an
//! empty store, which `run()` reports as `SchedulerExhausted`.

use core::convert::Infallible;

use log::{error, info, trace};

use crate::error::{Error, SchedResult};
use crate::event::{Event, EventSink};
use crate::store::TaskStore;
use crate::task::{Priority, TaskConfig, TaskEntry, TaskId, TaskState};
use crate::tick::{Clock, Tick};

// ---------------------------------------------------------------------------
// Scheduler state
// ---------------------------------------------------------------------------

/// State of the scheduler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Between iterations, or sleeping until the next release.
    Idle,
    /// Choosing the next task.
    Dispatching,
    /// A task body is executing.
    TaskRunning,
}

/// Outcome of a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The given task ran for one period.
    Dispatched(TaskId),
    /// Nothing was due; the loop slept until `until`.
    Idle { until: Tick },
}

/// Aggregate loop counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Task bodies invoked.
    pub dispatches: u64,
    /// Iterations that found nothing due and slept.
    pub idle_waits: u64,
    /// Dispatches that finished after their deadline.
    pub missed_deadlines: u64,
}

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// Fixed-priority periodic scheduler.
///
/// - `C`: time source
/// - `S`: receiver of completion / missed-deadline events
/// - `N`: task store capacity
///
/// Tasks are registered through `&mut self` before the loop starts; once
/// `run()` is entered the store is only touched by the loop itself.
pub struct Scheduler<'a, C: Clock, S: EventSink, const N: usize> {
    store: TaskStore<'a, N>,
    clock: C,
    sink: S,
    state: SchedulerState,
    running: Option<TaskId>,
    stats: SchedulerStats,
}

impl<'a, C: Clock, S: EventSink, const N: usize> Scheduler<'a, C, S, N> {
    /// Create a scheduler with an empty task store.
    pub fn new(clock: C, sink: S) -> Self {
        Self {
            store: TaskStore::new(),
            clock,
            sink,
            state: SchedulerState::Idle,
            running: None,
            stats: SchedulerStats::default(),
        }
    }

    /// Register a task released first at tick zero. See [`TaskStore::register`].
    pub fn register(
        &mut self,
        priority: Priority,
        period: u32,
        entry: TaskEntry<'a>,
    ) -> SchedResult<TaskId> {
        self.store.register(priority, period, entry)
    }

    /// Register a task from a full [`TaskConfig`].
    pub fn create(&mut self, config: TaskConfig, entry: TaskEntry<'a>) -> SchedResult<TaskId> {
        self.store.create(config, entry)
    }

    /// Task that would be dispatched at `now`.
    pub fn select_ready(&self, now: Tick) -> Option<TaskId> {
        self.store.select_ready(now)
    }

    /// Run one iteration of the loop.
    ///
    /// # Errors
    /// [`Error::SchedulerExhausted`] if no task is registered.
    pub fn step(&mut self) -> SchedResult<Step> {
        self.step_bounded(None)
    }

    /// Run the loop until the clock reaches `horizon`.
    ///
    /// Tasks released after the horizon are not dispatched; an idle wait that
    /// would overshoot stops at the horizon. Returns the number of dispatches.
    pub fn run_until(&mut self, horizon: Tick) -> SchedResult<u64> {
        let before = self.stats.dispatches;
        while self.clock.now().is_before(horizon) {
            self.step_bounded(Some(horizon))?;
        }
        Ok(self.stats.dispatches - before)
    }

    /// Run the loop forever.
    ///
    /// Only returns on a fatal condition, which is always an error.
    pub fn run(&mut self) -> SchedResult<Infallible> {
        if self.store.is_empty() {
            error!("scheduler started with no tasks");
            return Err(Error::SchedulerExhausted);
        }

        info!(
            "scheduler running: {} tasks, now {}",
            self.store.len(),
            self.clock.now()
        );
        loop {
            self.step()?;
        }
    }

    fn step_bounded(&mut self, horizon: Option<Tick>) -> SchedResult<Step> {
        if self.store.is_empty() {
            return Err(Error::SchedulerExhausted);
        }

        self.state = SchedulerState::Dispatching;
        let now = self.clock.now();
        self.wake_due(now);

        if let Some(id) = self.store.select_ready(now) {
            self.dispatch(id)?;
            return Ok(Step::Dispatched(id));
        }

        // Nothing due: sleep until the earliest release.
        let mut until = self.store.next_release().ok_or(Error::SchedulerExhausted)?;
        if let Some(limit) = horizon {
            if limit.is_before(until) {
                until = limit;
            }
        }

        self.state = SchedulerState::Idle;
        self.stats.idle_waits += 1;
        trace!("idle at {} until {}", now, until);
        self.clock.wait_until(until);
        Ok(Step::Idle { until })
    }

    /// Move every released Dormant task to Ready.
    fn wake_due(&mut self, now: Tick) {
        for tcb in self.store.iter_mut() {
            if tcb.state() == TaskState::Dormant && tcb.is_due(now) {
                tcb.set_state(TaskState::Ready);
            }
        }
    }

    fn dispatch(&mut self, id: TaskId) -> SchedResult<()> {
        let tcb = self.store.get_mut(id)?;
        let release = tcb.next_wake();
        let deadline = tcb.deadline();

        tcb.set_state(TaskState::Running);
        self.running = Some(id);
        self.state = SchedulerState::TaskRunning;
        trace!("dispatch {} '{}' release {}", id, tcb.name(), release);

        tcb.invoke();

        let finished = self.clock.now();
        let missed = tcb.complete_release(finished);
        let name = tcb.name();

        self.running = None;
        self.state = SchedulerState::Idle;
        self.stats.dispatches += 1;

        let event = if missed {
            self.stats.missed_deadlines += 1;
            Event::MissedDeadline {
                task: id,
                name,
                deadline,
                finished,
            }
        } else {
            Event::Completed {
                task: id,
                name,
                release,
                finished,
            }
        };
        self.sink.on_event(&event);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Task currently executing, if any.
    #[inline]
    pub fn running(&self) -> Option<TaskId> {
        self.running
    }

    #[inline]
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    #[inline]
    pub fn store(&self) -> &TaskStore<'a, N> {
        &self.store
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Current tick according to the scheduler's clock.
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LogSink;
    use crate::tick::ManualClock;

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl EventSink for Recorder {
        fn on_event(&mut self, event: &Event) {
            self.0.push(*event);
        }
    }

    #[test]
    fn test_new_scheduler_is_idle() {
        let sched: Scheduler<'_, ManualClock, LogSink, 4> = Scheduler::new(ManualClock::new(), LogSink);
        assert_eq!(sched.state(), SchedulerState::Idle);
        assert_eq!(sched.running(), None);
        assert_eq!(*sched.stats(), SchedulerStats::default());
    }

    #[test]
    fn test_step_without_tasks_is_exhausted() {
        let mut sched: Scheduler<'_, ManualClock, LogSink, 4> = Scheduler::new(ManualClock::new(), LogSink);
        assert_eq!(sched.step(), Err(Error::SchedulerExhausted));
        assert_eq!(sched.run().unwrap_err(), Error::SchedulerExhausted);
    }

    #[test]
    fn test_dispatch_advances_by_period() {
        let mut runs = 0u32;
        let mut body = || runs += 1;
        {
            let mut sched: Scheduler<'_, ManualClock, Recorder, 4> =
                Scheduler::new(ManualClock::new(), Recorder::default());
            let id = sched.register(Priority(1), 200, &mut body).unwrap();

            assert_eq!(sched.step(), Ok(Step::Dispatched(id)));
            let tcb = sched.store().get(id).unwrap();
            assert_eq!(tcb.next_wake(), Tick(200));
            assert_eq!(tcb.state(), TaskState::Dormant);
            assert_eq!(sched.state(), SchedulerState::Idle);
            assert_eq!(sched.running(), None);
            assert_eq!(sched.sink().0.len(), 1);
            assert!(!sched.sink().0[0].is_miss());
        }
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_idle_step_sleeps_until_next_release() {
        let mut body = || {};
        let mut sched: Scheduler<'_, ManualClock, Recorder, 4> =
            Scheduler::new(ManualClock::new(), Recorder::default());
        sched.register(Priority(1), 200, &mut body).unwrap();

        assert_eq!(sched.step(), Ok(Step::Dispatched(TaskId(0))));
        assert_eq!(sched.step(), Ok(Step::Idle { until: Tick(200) }));
        assert_eq!(sched.now(), Tick(200));
        assert_eq!(sched.stats().idle_waits, 1);
        assert_eq!(sched.step(), Ok(Step::Dispatched(TaskId(0))));
    }

    #[test]
    fn test_wake_marks_due_tasks_ready() {
        let (mut a, mut b) = (|| {}, || {});
        let mut sched: Scheduler<'_, ManualClock, Recorder, 4> =
            Scheduler::new(ManualClock::new(), Recorder::default());
        let hi = sched.register(Priority(2), 100, &mut a).unwrap();
        let lo = sched.register(Priority(1), 100, &mut b).unwrap();

        assert_eq!(sched.step(), Ok(Step::Dispatched(hi)));
        // The low-priority task was released at 0 and is still waiting.
        assert_eq!(sched.store().get(lo).unwrap().state(), TaskState::Ready);
        assert_eq!(sched.store().get(hi).unwrap().state(), TaskState::Dormant);
    }

    #[test]
    fn test_run_until_stops_at_horizon() {
        let mut body = || {};
        let mut sched: Scheduler<'_, ManualClock, Recorder, 4> =
            Scheduler::new(ManualClock::new(), Recorder::default());
        let id = sched.register(Priority(1), 100, &mut body).unwrap();

        // Releases at 0, 100, 200, 300, 400; the one at 450 is past the horizon.
        assert_eq!(sched.run_until(Tick(450)), Ok(5));
        assert_eq!(sched.now(), Tick(450));
        assert_eq!(sched.store().get(id).unwrap().next_wake(), Tick(500));
    }

    #[test]
    fn test_missed_deadline_is_counted_not_fatal() {
        let clock = ManualClock::new();
        let mut slow = || clock.advance(250);
        let mut sched: Scheduler<'_, &ManualClock, Recorder, 4> =
            Scheduler::new(&clock, Recorder::default());
        let id = sched.register(Priority(1), 200, &mut slow).unwrap();

        assert_eq!(sched.step(), Ok(Step::Dispatched(id)));
        assert_eq!(sched.stats().missed_deadlines, 1);
        assert_eq!(sched.store().get(id).unwrap().stats().missed_deadlines, 1);
        assert!(sched.sink().0[0].is_miss());

        // Already overdue: dispatched again immediately, and keeps running.
        assert_eq!(sched.step(), Ok(Step::Dispatched(id)));
        assert_eq!(sched.store().get(id).unwrap().next_wake(), Tick(400));
    }
}
