//! # Cortex-M4 Port Layer
//!
//! Hardware-specific pieces for the ARM Cortex-M4: the SysTick-driven tick
//! counter behind [`SysTickClock`], and an ITM-backed `log` logger for the
//! console sink.
//!
//! ## Tick Source
//!
//! SysTick fires at `TICK_HZ`. Its handler only increments an atomic
//! counter; all scheduling decisions happen in thread mode inside the
//! scheduler loop. While the loop is idle it sleeps with `wfi`, so the core
//! stays halted until the next interrupt.
//!
//! ## Interrupt Priorities
//!
//! - SysTick: Priority 0xFF (lowest), never delays application ISRs

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{itm, ITM, SCB, SYST};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::{SYSTEM_CLOCK_HZ, TICK_HZ};
use crate::tick::{Clock, Tick};

// ---------------------------------------------------------------------------
// SysTick configuration
// ---------------------------------------------------------------------------

/// Ticks since SysTick was started. Written only by the SysTick handler.
static TICKS: AtomicU32 = AtomicU32::new(0);

/// Configure the SysTick timer for the scheduler tick.
///
/// Sets up SysTick to fire at `TICK_HZ` frequency using the processor
/// clock. Each tick triggers `SysTick` below, which advances the counter.
pub fn configure_systick(syst: &mut SYST) {
    let reload = SYSTEM_CLOCK_HZ / TICK_HZ - 1;
    syst.set_reload(reload);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Set SysTick to the lowest exception priority.
pub fn set_interrupt_priorities(scb: &mut SCB) {
    // SAFETY: changing SysTick's priority cannot break a priority-based
    // critical section; the handler touches nothing but an atomic.
    unsafe {
        scb.set_priority(SystemHandler::SysTick, 0xFF);
    }
}

/// SysTick exception handler. Advances the tick counter.
#[no_mangle]
pub unsafe extern "C" fn SysTick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Scheduler clock backed by the SysTick counter.
pub struct SysTickClock {
    _syst: SYST,
}

impl SysTickClock {
    /// Take ownership of SysTick, configure it and start counting from zero.
    pub fn start(mut syst: SYST, scb: &mut SCB) -> Self {
        TICKS.store(0, Ordering::Relaxed);
        set_interrupt_priorities(scb);
        configure_systick(&mut syst);
        Self { _syst: syst }
    }
}

impl Clock for SysTickClock {
    fn now(&self) -> Tick {
        Tick(TICKS.load(Ordering::Relaxed))
    }

    fn wait_until(&self, wake: Tick) {
        while self.now().is_before(wake) {
            cortex_m::asm::wfi();
        }
    }
}

// ---------------------------------------------------------------------------
// ITM logger
// ---------------------------------------------------------------------------

/// `log` backend writing one line per record to ITM stimulus port 0.
struct ItmLogger;

static LOGGER: ItmLogger = ItmLogger;

impl Log for ItmLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        cortex_m::interrupt::free(|_cs| {
            // SAFETY: the ITM register block is only written from inside this
            // critical section, so no other writer can interleave.
            let itm = unsafe { &mut *(ITM::PTR as *mut itm::RegisterBlock) };
            cortex_m::iprintln!(&mut itm.stim[0], "[{}] {}", record.level(), record.args());
        });
    }

    fn flush(&self) {}
}

/// Install the ITM logger as the global `log` backend.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
