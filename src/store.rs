//! # Task Control Block Store
//!
//! Fixed-capacity table of registered tasks. Tasks are registered once during
//! system initialization and live for the lifetime of the store; there is no
//! removal. Storage is a `heapless::Vec`, so the whole table lives inline in
//! the scheduler with no heap allocation.

use heapless::Vec;
use log::debug;

use crate::error::{Error, SchedResult};
use crate::task::{Priority, TaskConfig, TaskControlBlock, TaskEntry, TaskId};

/// Fixed-capacity table of TCBs, indexed by [`TaskId`].
pub struct TaskStore<'a, const N: usize> {
    tasks: Vec<TaskControlBlock<'a>, N>,
}

impl<'a, const N: usize> TaskStore<'a, N> {
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a task released first at tick zero.
    ///
    /// # Errors
    /// - [`Error::InvalidPeriod`] if `period` is zero
    /// - [`Error::CapacityExceeded`] if the store is full
    pub fn register(
        &mut self,
        priority: Priority,
        period: u32,
        entry: TaskEntry<'a>,
    ) -> SchedResult<TaskId> {
        self.create(TaskConfig::new(priority, period), entry)
    }

    /// Register a task from a full [`TaskConfig`].
    ///
    /// A rejected registration leaves the store unchanged.
    pub fn create(&mut self, config: TaskConfig, entry: TaskEntry<'a>) -> SchedResult<TaskId> {
        if config.period == 0 {
            return Err(Error::InvalidPeriod);
        }
        if self.tasks.is_full() {
            return Err(Error::CapacityExceeded);
        }

        let id = TaskId(self.tasks.len());
        self.tasks
            .push(TaskControlBlock::new(id, config, entry))
            .map_err(|_| Error::CapacityExceeded)?;

        debug!(
            "registered {} '{}' prio={} period={} first={}",
            id, config.name, config.priority.0, config.period, config.offset
        );
        Ok(id)
    }

    /// Look up a task.
    pub fn get(&self, id: TaskId) -> SchedResult<&TaskControlBlock<'a>> {
        self.tasks.get(id.index()).ok_or(Error::UnknownTask(id))
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> SchedResult<&mut TaskControlBlock<'a>> {
        self.tasks.get_mut(id.index()).ok_or(Error::UnknownTask(id))
    }

    /// Number of registered tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Maximum number of tasks.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Registered tasks in registration (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskControlBlock<'a>> {
        self.tasks.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TaskControlBlock<'a>> {
        self.tasks.iter_mut()
    }
}

impl<const N: usize> Default for TaskStore<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for TaskStore<'_, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.tasks.iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
