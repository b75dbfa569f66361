//! # Demo Workloads
//!
//! The four periodic tasks of the TickOS demo firmware. Each body does a
//! small, bounded piece of work, logs the result and returns:
//!
//! | Task | Priority | Period | Work |
//! |------|----------|--------|------|
//! | Task 1 | 1 | 200 ms | completion report |
//! | Task 2 | 2 | 500 ms | Fahrenheit → Celsius conversion |
//! | Task 3 | 3 | 1000 ms | 64-bit multiplication |
//! | Task 4 | 4 | 100 ms | binary search over a 50-element table |
//!
//! The computations are exposed as plain functions so they can be checked on
//! the host.

use log::info;

use crate::config::ms_to_ticks;
use crate::task::{Priority, TaskConfig};

/// Static description of one demo task.
#[derive(Debug, Clone, Copy)]
pub struct DemoTask {
    pub name: &'static str,
    pub priority: Priority,
    pub period_ms: u32,
    pub body: fn(),
}

impl DemoTask {
    /// Scheduler configuration for this task, first released at tick zero.
    pub const fn config(&self) -> TaskConfig {
        TaskConfig::new(self.priority, ms_to_ticks(self.period_ms)).named(self.name)
    }
}

/// The demo task set, in registration order.
pub const TASKS: [DemoTask; 4] = [
    DemoTask {
        name: "Task 1",
        priority: Priority(1),
        period_ms: 200,
        body: report_completion,
    },
    DemoTask {
        name: "Task 2",
        priority: Priority(2),
        period_ms: 500,
        body: convert_temperature,
    },
    DemoTask {
        name: "Task 3",
        priority: Priority(3),
        period_ms: 1000,
        body: multiply,
    },
    DemoTask {
        name: "Task 4",
        priority: Priority(4),
        period_ms: 100,
        body: search_table,
    },
];

// ---------------------------------------------------------------------------
// Task 1
// ---------------------------------------------------------------------------

pub fn report_completion() {
    info!("Task 1 : Completed.");
}

// ---------------------------------------------------------------------------
// Task 2
// ---------------------------------------------------------------------------

const FAHRENHEIT: f32 = 9120.0;

pub fn fahrenheit_to_celsius(f: f32) -> f32 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn convert_temperature() {
    let c = fahrenheit_to_celsius(FAHRENHEIT);
    info!(
        "The temperature {:.2} in Fahrenheit is equivalent to {:.2} in Celsius",
        FAHRENHEIT, c
    );
}

// ---------------------------------------------------------------------------
// Task 3
// ---------------------------------------------------------------------------

const FIRST_FACTOR: i64 = 1_000_000_000;
const SECOND_FACTOR: i64 = 2_564_851_111;

/// `a * b`, or `None` on overflow.
pub fn checked_product(a: i64, b: i64) -> Option<i64> {
    a.checked_mul(b)
}

pub fn multiply() {
    match checked_product(FIRST_FACTOR, SECOND_FACTOR) {
        Some(product) => info!("The result of the multiplication is : {}", product),
        None => info!("The multiplication overflowed"),
    }
}

// ---------------------------------------------------------------------------
// Task 4
// ---------------------------------------------------------------------------

const TABLE_LEN: usize = 50;
const SEARCH_TARGET: i32 = 36;

/// Iterative binary search over a sorted slice.
pub fn binary_search(table: &[i32], target: i32) -> Option<usize> {
    let mut low = 0usize;
    let mut high = table.len();

    while low < high {
        let mid = low + (high - low) / 2;
        match table[mid].cmp(&target) {
            core::cmp::Ordering::Equal => return Some(mid),
            core::cmp::Ordering::Less => low = mid + 1,
            core::cmp::Ordering::Greater => high = mid,
        }
    }
    None
}

pub fn search_table() {
    let mut table = [0i32; TABLE_LEN];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = i as i32;
    }

    match binary_search(&table, SEARCH_TARGET) {
        Some(index) => info!(
            "The element {} is found at the index {}.",
            SEARCH_TARGET, index
        ),
        None => info!("The element {} is not found in the list.", SEARCH_TARGET),
    }
}
