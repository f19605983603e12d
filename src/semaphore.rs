//! Counting semaphores.
//!
//! Each of the five slots holds a signed value and a FIFO wait queue.
//! Grounded on the original's `semaphore_t` (`sem_value` + `plist`), kept
//! as the classic encoding where a negative value's magnitude is the
//! number of blocked waiters — `sem_P` decrements first and blocks only
//! if the result went negative, `sem_V` increments first and wakes a
//! waiter only if the result is not positive.

use crate::list::{List, ListExhausted, NodeId};
use crate::process::Pid;

/// One semaphore slot. Starts uninitialized; `new_Sem` must be called
/// before `sem_P`/`sem_V` will operate on it.
pub struct Semaphore {
    initialized: bool,
    value: i64,
    waiters: List<Pid>,
}

/// Result of a `sem_P` call: either the caller keeps running, or it was
/// appended to the wait queue and the handle it was stored under (for
/// the PCB's `queue_node`) is returned alongside.
pub enum ProceedOrBlock {
    Proceed,
    Blocked(NodeId),
}

impl Semaphore {
    pub fn new(wait_queue_capacity: usize) -> Self {
        Self {
            initialized: false,
            value: 0,
            waiters: List::new(wait_queue_capacity),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn waiter_count(&self) -> usize {
        self.waiters.count()
    }

    /// Walk the wait queue head-to-tail without disturbing its cursor,
    /// for introspection (`totalinfo`).
    pub fn iter_waiters(&self) -> impl Iterator<Item = &Pid> + '_ {
        self.waiters.iter()
    }

    /// Initialize this slot with a non-negative starting value. Callers
    /// validate the "already initialized" and "negative init value"
    /// preconditions before calling this.
    pub fn initialize(&mut self, init_value: i64) {
        self.initialized = true;
        self.value = init_value;
    }

    /// `P`: decrement, and block the caller if the result is negative.
    pub fn p(&mut self, caller: Pid) -> Result<ProceedOrBlock, ListExhausted> {
        self.value -= 1;
        if self.value < 0 {
            let node = self.waiters.append(caller)?;
            Ok(ProceedOrBlock::Blocked(node))
        } else {
            Ok(ProceedOrBlock::Proceed)
        }
    }

    /// `V`: increment, and wake the longest-waiting blocked process if
    /// the result is not positive (i.e. there was somebody to wake).
    pub fn v(&mut self) -> Option<Pid> {
        self.value += 1;
        if self.value <= 0 {
            self.waiters.first();
            self.waiters.remove()
        } else {
            None
        }
    }

    /// Remove a specific waiter by handle (used when `kill` targets a
    /// process blocked on this semaphore) and credit the semaphore value
    /// back, since the slot it was occupying is no longer waited on.
    pub fn remove_waiter(&mut self, node: NodeId) -> Pid {
        let pid = self.waiters.detach(node);
        self.value += 1;
        pid
    }
}
