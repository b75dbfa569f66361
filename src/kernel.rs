//! # Kernel
//!
//! System bring-up for TickOS. The application builds a [`Scheduler`],
//! registers its tasks, and hands it to [`start`], which never returns.
//!
//! ## Startup Sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► arch::cortex_m4::init()   ← logger, SysTick
//!         ├─► Scheduler::new(clock, sink)
//!         ├─► scheduler.create(..)      ← register tasks (×N)
//!         └─► kernel::start(scheduler)  ← run loop (no return)
//! ```
//!
//! There is no global scheduler instance: the scheduler is owned by the
//! caller and moved into `start()`.

use log::{error, info};

use crate::event::EventSink;
use crate::scheduler::Scheduler;
use crate::tick::Clock;

/// Run the scheduler forever. **Does not return.**
///
/// If the loop gives up (`SchedulerExhausted`) the cause is logged at
/// `error` level and the kernel panics with it, leaving the final report to
/// the platform panic handler.
pub fn start<'a, C: Clock, S: EventSink, const N: usize>(mut scheduler: Scheduler<'a, C, S, N>) -> ! {
    info!(
        "TickOS starting: {}/{} task slots used",
        scheduler.store().len(),
        scheduler.store().capacity()
    );

    match scheduler.run() {
        Ok(never) => match never {},
        Err(err) => {
            error!("kernel halted: {}", err);
            panic!("kernel halted: {}", err);
        }
    }
}
