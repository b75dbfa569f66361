//! # TickOS: Fixed-Priority Periodic Scheduler
//!
//! A minimal real-time scheduling core for ARM Cortex-M4 microcontrollers,
//! testable on the host.
//!
//! ## Overview
//!
//! TickOS runs a fixed set of independent periodic tasks. Each task has a
//! static priority and a period in ticks; every period its entry routine
//! runs once, to completion, and returns control to the scheduler:
//!
//! - **The highest-priority due task always wins the next dispatch**
//! - **Equal priorities are served in registration order**
//! - **Releases follow delay-until semantics: no period drift**
//! - **Overruns are reported as missed deadlines, never fatal**
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │             Application Tasks (demo.rs)                 │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel API (kernel.rs)                  │
//! │                 start(scheduler) -> !                   │
//! ├──────────────────────────────┬─────────────────────────┤
//! │  Scheduler (scheduler.rs)    │  Events (event.rs)      │
//! │  ─ step() · run()            │  ─ Completed            │
//! │  ─ run_until()               │  ─ MissedDeadline       │
//! ├──────────────────────────────┴─────────────────────────┤
//! │  Ready-Queue (ready.rs)   select_ready · next_release   │
//! ├────────────────────────────────────────────────────────┤
//! │  TCB Store (store.rs) · Task Model (task.rs)            │
//! ├────────────────────────────────────────────────────────┤
//! │  Clock Source (tick.rs)   Tick · Clock · ManualClock    │
//! ├────────────────────────────────────────────────────────┤
//! │  Arch Port (arch/cortex_m4.rs)  SysTick · ITM logger    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use tickos::event::LogSink;
//! use tickos::scheduler::{Scheduler, Step};
//! use tickos::task::{Priority, TaskId};
//! use tickos::tick::{ManualClock, Tick};
//!
//! let mut sample = || {};
//! let mut report = || {};
//!
//! let mut sched: Scheduler<'_, ManualClock, LogSink, 4> =
//!     Scheduler::new(ManualClock::new(), LogSink);
//! sched.register(Priority(1), 200, &mut report).unwrap();
//! sched.register(Priority(2), 50, &mut sample).unwrap();
//!
//! assert_eq!(sched.step(), Ok(Step::Dispatched(TaskId(1))));
//! assert_eq!(sched.step(), Ok(Step::Dispatched(TaskId(0))));
//! assert_eq!(sched.step(), Ok(Step::Idle { until: Tick(50) }));
//! ```
//!
//! ## Memory Model
//!
//! - **No heap**: the TCB table is a `heapless::Vec` owned by the scheduler
//! - **No globals**: the scheduler is built by the caller and moved into
//!   `kernel::start()`; the only mutable static is the SysTick counter
//! - **Borrowed entries**: task bodies are `&mut dyn FnMut()` that outlive
//!   the scheduler

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod tick;
pub mod task;
pub mod store;
pub mod ready;
pub mod event;
pub mod scheduler;
pub mod kernel;
pub mod demo;
pub mod arch;

pub use error::{Error, SchedResult};
