//! # TickOS Configuration
//!
//! Compile-time constants governing the scheduler and system behavior.
//! All limits are fixed at compile time; no dynamic allocation.

/// Maximum number of tasks the default task store can hold.
/// This bounds the static TCB table. The demo firmware registers four.
pub const MAX_TASKS: usize = 8;

/// SysTick frequency in Hz. One tick is the scheduler's time quantum.
/// At 1000 Hz one tick equals one millisecond.
pub const TICK_HZ: u32 = 1000;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Convert a duration in milliseconds to scheduler ticks at `TICK_HZ`.
///
/// Rounds down, like the usual RTOS `MS_TO_TICKS` helpers. Computed in
/// 64-bit to avoid overflow for long periods.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ((ms as u64 * TICK_HZ as u64) / 1000) as u32
}
