//! # Errors
//!
//! Error taxonomy of the scheduler core.
//!
//! | Variant | Raised by | Severity |
//! |---------|-----------|----------|
//! | `InvalidPeriod` | registration | rejected, non-fatal |
//! | `CapacityExceeded` | registration | rejected, non-fatal |
//! | `UnknownTask` | lookup | non-fatal |
//! | `MissedDeadline` | scheduler loop | recorded as an event, never returned |
//! | `SchedulerExhausted` | `Scheduler::run()` | fatal |

use crate::task::TaskId;
use crate::tick::Tick;

/// Scheduler error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A task was registered with a zero period.
    #[error("task period must be greater than zero")]
    InvalidPeriod,

    /// The task store is full.
    #[error("task store capacity exceeded")]
    CapacityExceeded,

    /// No task with this id is registered.
    #[error("unknown task {0}")]
    UnknownTask(TaskId),

    /// A task body returned after its deadline (its next scheduled release).
    #[error("task {task} missed its deadline: due {deadline}, finished {finished}")]
    MissedDeadline {
        task: TaskId,
        deadline: Tick,
        finished: Tick,
    },

    /// The scheduler loop cannot continue.
    #[error("scheduler exhausted: no task can ever be dispatched")]
    SchedulerExhausted,
}

impl Error {
    /// Fatal errors halt the system; everything else is reported and survived.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Error::SchedulerExhausted)
    }
}

/// Result alias used throughout the crate.
pub type SchedResult<T> = Result<T, Error>;
