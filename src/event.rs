//! # Scheduler Events
//!
//! Observable side effects of the scheduler loop. Every dispatch ends in
//! exactly one event: a completion or a missed deadline. Events go to an
//! [`EventSink`]; the default [`LogSink`] turns each one into a single log
//! line through the `log` facade.

use core::fmt;

use log::{debug, warn};

use crate::error::Error;
use crate::task::TaskId;
use crate::tick::Tick;

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The task finished at or before its deadline.
    Completed {
        task: TaskId,
        name: &'static str,
        release: Tick,
        finished: Tick,
    },
    /// The task finished after its deadline.
    MissedDeadline {
        task: TaskId,
        name: &'static str,
        deadline: Tick,
        finished: Tick,
    },
}

impl Event {
    pub fn task(&self) -> TaskId {
        match *self {
            Event::Completed { task, .. } | Event::MissedDeadline { task, .. } => task,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Event::MissedDeadline { .. })
    }

    /// The error describing this event, for misses.
    pub fn as_error(&self) -> Option<Error> {
        match *self {
            Event::MissedDeadline {
                task,
                deadline,
                finished,
                ..
            } => Some(Error::MissedDeadline {
                task,
                deadline,
                finished,
            }),
            Event::Completed { .. } => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::Completed {
                task,
                name,
                release,
                finished,
            } => write!(
                f,
                "{} ({}) completed: released {}, finished {}",
                name, task, release, finished
            ),
            Event::MissedDeadline {
                task,
                name,
                deadline,
                finished,
            } => write!(
                f,
                "{} ({}) missed deadline: due {}, finished {} ({} ticks late)",
                name,
                task,
                deadline,
                finished,
                finished.delta(deadline)
            ),
        }
    }
}

/// Receiver of scheduler events.
///
/// Called from the scheduler loop between dispatches; must not block.
pub trait EventSink {
    fn on_event(&mut self, event: &Event);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: &Event) {
        (**self).on_event(event)
    }
}

/// Writes one log line per event: `warn!` for misses, `debug!` for
/// completions.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &Event) {
        if event.is_miss() {
            warn!("{}", event);
        } else {
            debug!("{}", event);
        }
    }
}
