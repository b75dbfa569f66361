//! # Task Control Block
//!
//! Defines the task model for TickOS. Each task is an independent periodic
//! unit of work with a fixed priority and a fixed period. Its entry routine
//! performs one period's worth of work per dispatch and then returns.
//!
//! ## Release Model
//!
//! A task is released at `next_wake`, `next_wake + period`,
//! `next_wake + 2·period`, ... The scheduler advances `next_wake` from the
//! previous *scheduled* release, not from the completion time, so execution
//! jitter never accumulates into period drift (delay-until semantics).

use core::fmt;

use crate::tick::Tick;

// ---------------------------------------------------------------------------
// Identity and priority
// ---------------------------------------------------------------------------

/// Unique task identifier, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub usize);

impl TaskId {
    /// Index of this task in the store.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Static task priority. Higher value = more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(pub u8);

impl Priority {
    /// Lowest priority, just above an idle loop.
    pub const LOWEST: Priority = Priority(0);
    /// Highest representable priority.
    pub const HIGHEST: Priority = Priority(u8::MAX);
}

// ---------------------------------------------------------------------------
// Task state machine
// ---------------------------------------------------------------------------

/// Execution state of a task.
///
/// ```text
///   ┌──────────┐   next_wake reached   ┌─────────┐
///   │ Dormant  │ ────────────────────► │  Ready  │
///   └──────────┘                       └─────────┘
///        ▲                                  │ selected
///        │  entry returned,                 ▼
///        │  next release in future     ┌─────────┐
///        └──────────────────────────── │ Running │
///                                      └─────────┘
///             entry returned, next release already due → Ready
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for its next release.
    Dormant,
    /// Released and waiting to be dispatched.
    Ready,
    /// Its entry routine is executing.
    Running,
}

// ---------------------------------------------------------------------------
// Task configuration (immutable after creation)
// ---------------------------------------------------------------------------

/// Static configuration for a task, set at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConfig {
    /// Diagnostic name used in log lines.
    pub name: &'static str,

    /// Fixed priority (higher = more important).
    pub priority: Priority,

    /// Period in ticks. Must be non-zero.
    pub period: u32,

    /// Tick of the first release.
    pub offset: Tick,
}

impl TaskConfig {
    /// Unnamed task released first at tick zero.
    pub const fn new(priority: Priority, period: u32) -> Self {
        Self {
            name: "task",
            priority,
            period,
            offset: Tick::ZERO,
        }
    }

    /// Set the diagnostic name.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Set the first release tick.
    pub const fn first_release(mut self, offset: Tick) -> Self {
        self.offset = offset;
        self
    }
}

// ---------------------------------------------------------------------------
// Runtime statistics
// ---------------------------------------------------------------------------

/// Per-task counters maintained by the scheduler loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of completed dispatches.
    pub activations: u32,

    /// Number of dispatches that finished after their deadline.
    pub missed_deadlines: u32,

    /// Ticks from scheduled release to completion, last dispatch.
    pub last_response: u32,

    /// Largest observed release-to-completion time.
    pub worst_response: u32,
}

// ---------------------------------------------------------------------------
// Task Control Block
// ---------------------------------------------------------------------------

/// Borrowed task entry routine. Called once per period, must return.
pub type TaskEntry<'a> = &'a mut (dyn FnMut() + 'a);

/// Task Control Block (TCB): the scheduler's record of one task.
///
/// Configuration is read-only after registration; `next_wake`, `state` and
/// `stats` are mutated only by the scheduler loop.
pub struct TaskControlBlock<'a> {
    id: TaskId,
    config: TaskConfig,
    next_wake: Tick,
    state: TaskState,
    stats: TaskStats,
    entry: TaskEntry<'a>,
}

impl<'a> TaskControlBlock<'a> {
    pub(crate) fn new(id: TaskId, config: TaskConfig, entry: TaskEntry<'a>) -> Self {
        Self {
            id,
            config,
            next_wake: config.offset,
            state: TaskState::Dormant,
            stats: TaskStats::default(),
            entry,
        }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.config.name
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.config.priority
    }

    /// Period in ticks.
    #[inline]
    pub fn period(&self) -> u32 {
        self.config.period
    }

    #[inline]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Absolute tick of the next release.
    #[inline]
    pub fn next_wake(&self) -> Tick {
        self.next_wake
    }

    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    #[inline]
    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    /// Released at or before `now`.
    #[inline]
    pub fn is_due(&self, now: Tick) -> bool {
        self.next_wake.is_at_or_before(now)
    }

    /// Deadline of the current release: the next scheduled release.
    #[inline]
    pub fn deadline(&self) -> Tick {
        self.next_wake.wrapping_add(self.config.period)
    }

    pub(crate) fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }

    /// Run one period's worth of work.
    pub(crate) fn invoke(&mut self) {
        (self.entry)();
    }

    /// Close out the current release: record statistics and move `next_wake`
    /// to the following scheduled release.
    ///
    /// Returns `true` if the completion at `finished` missed the deadline.
    pub(crate) fn complete_release(&mut self, finished: Tick) -> bool {
        let deadline = self.deadline();
        let missed = finished.is_after(deadline);

        let response = finished.delta(self.next_wake).max(0) as u32;
        self.stats.activations = self.stats.activations.wrapping_add(1);
        self.stats.last_response = response;
        self.stats.worst_response = self.stats.worst_response.max(response);
        if missed {
            self.stats.missed_deadlines = self.stats.missed_deadlines.wrapping_add(1);
        }

        self.next_wake = deadline;
        self.state = if self.is_due(finished) {
            TaskState::Ready
        } else {
            TaskState::Dormant
        };
        missed
    }
}

impl fmt::Debug for TaskControlBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskControlBlock")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("next_wake", &self.next_wake)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
