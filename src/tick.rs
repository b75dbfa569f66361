//! # Clock Source
//!
//! The scheduler's notion of time: a 32-bit tick counter advanced once per
//! time quantum by an external timer interrupt (SysTick on Cortex-M).
//!
//! ## Wraparound
//!
//! The counter wraps modulo 2^32. Ticks are therefore compared through their
//! signed difference, never with `<`/`>` on the raw values:
//!
//! ```text
//!   a.delta(b) = (a - b) as i32      // wrapping subtraction
//!   a is before b  <=>  a.delta(b) < 0
//! ```
//!
//! This is correct as long as the two ticks being compared are less than
//! 2^31 ticks apart (about 24 days at 1 kHz).

use core::cell::Cell;
use core::fmt;

/// An absolute point in scheduler time, in ticks.
///
/// Deliberately not `Ord`: use [`Tick::delta`] and the comparison helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tick(pub u32);

impl Tick {
    /// Tick zero, the scheduler epoch.
    pub const ZERO: Tick = Tick(0);

    /// Raw counter value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// `self + ticks`, wrapping around at 2^32.
    #[inline]
    pub const fn wrapping_add(self, ticks: u32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }

    /// Signed distance from `earlier` to `self`, wraparound-safe.
    ///
    /// Positive when `self` is after `earlier`.
    #[inline]
    pub const fn delta(self, earlier: Tick) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// True if `self` lies strictly before `other`.
    #[inline]
    pub const fn is_before(self, other: Tick) -> bool {
        self.delta(other) < 0
    }

    /// True if `self` lies at or before `other`.
    #[inline]
    pub const fn is_at_or_before(self, other: Tick) -> bool {
        self.delta(other) <= 0
    }

    /// True if `self` lies strictly after `other`.
    #[inline]
    pub const fn is_after(self, other: Tick) -> bool {
        self.delta(other) > 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// A monotonic tick source.
///
/// The scheduler reads `now()` before each dispatch decision and after each
/// task body returns. When nothing is due it calls `wait_until()` with the
/// earliest release tick; implementations sleep (or, for simulated clocks,
/// jump) until that tick has been reached.
pub trait Clock {
    /// Current tick.
    fn now(&self) -> Tick;

    /// Block the caller until `now()` has reached `wake`.
    ///
    /// Returns immediately if `wake` is not in the future.
    fn wait_until(&self, wake: Tick);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Tick {
        (**self).now()
    }

    fn wait_until(&self, wake: Tick) {
        (**self).wait_until(wake)
    }
}

// ---------------------------------------------------------------------------
// Manual clock
// ---------------------------------------------------------------------------

/// A clock driven by hand, for host tests and simulation.
///
/// Time only moves when the test calls [`advance`](ManualClock::advance) or
/// [`set`](ManualClock::set), or when the scheduler waits for a release. Task
/// bodies can hold a shared reference and advance it to model execution time.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: Cell<u32>,
}

impl ManualClock {
    /// A clock starting at tick zero.
    pub const fn new() -> Self {
        Self { ticks: Cell::new(0) }
    }

    /// A clock starting at `start`.
    pub const fn starting_at(start: Tick) -> Self {
        Self {
            ticks: Cell::new(start.0),
        }
    }

    /// Advance by `ticks`, wrapping.
    pub fn advance(&self, ticks: u32) {
        self.ticks.set(self.ticks.get().wrapping_add(ticks));
    }

    /// Jump to `tick`. Callers are responsible for keeping time monotonic.
    pub fn set(&self, tick: Tick) {
        self.ticks.set(tick.0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        Tick(self.ticks.get())
    }

    fn wait_until(&self, wake: Tick) {
        if self.now().is_before(wake) {
            self.set(wake);
        }
    }
}
