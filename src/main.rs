//! # TickOS Demo Firmware
//!
//! Runs the four periodic demo tasks on a Cortex-M4:
//!
//! | Task | Priority | Period | Behavior |
//! |------|----------|--------|----------|
//! | Task 1 | 1 | 200 ms | Reports completion |
//! | Task 2 | 2 | 500 ms | Converts a temperature to Celsius |
//! | Task 3 | 3 | 1000 ms | Multiplies two large integers |
//! | Task 4 | 4 | 100 ms | Binary-searches a 50-entry table |
//!
//! ## Expected Behavior
//!
//! At tick 0 all four are due and run in priority order: Task 4, Task 3,
//! Task 2, Task 1. Afterwards each runs once per period; coincident
//! releases are again served highest priority first. Output goes to ITM
//! stimulus port 0.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use log::LevelFilter;
use panic_halt as _;

use tickos::arch::cortex_m4::{self, SysTickClock};
use tickos::config::MAX_TASKS;
use tickos::demo;
use tickos::event::LogSink;
use tickos::kernel;
use tickos::scheduler::Scheduler;

/// Firmware entry point. Registers the demo tasks and starts the
/// scheduler. Does not return.
#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // No debugger attached: run silently.
    let _ = cortex_m4::init_logger(LevelFilter::Info);

    // Task bodies must outlive the scheduler.
    let mut bodies = demo::TASKS.map(|task| task.body);

    let clock = SysTickClock::start(cp.SYST, &mut cp.SCB);
    let mut scheduler: Scheduler<'_, SysTickClock, LogSink, MAX_TASKS> =
        Scheduler::new(clock, LogSink);

    for (task, body) in demo::TASKS.iter().zip(bodies.iter_mut()) {
        scheduler
            .create(task.config(), body)
            .expect("Failed to create demo task");
    }

    // Start the scheduler; does not return
    kernel::start(scheduler)
}
