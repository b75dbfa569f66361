//! # Architecture Abstraction Layer
//!
//! Hardware tick sources and console backends. Currently implements the
//! Cortex-M4 port; host builds use [`ManualClock`](crate::tick::ManualClock)
//! instead.

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod cortex_m4;
