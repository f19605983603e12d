//! Configuration constants.
//!
//! These mirror the fixed-capacity constants of the original simulator.
//! The list pools are sized here rather than hardcoded into [`crate::list`]
//! so a `Simulator` can be built with a non-default capacity in tests
//! (property tests in particular want small pools to force exhaustion
//! paths) without touching the data structure itself.

/// Default maximum number of list nodes across every queue a `Simulator`
/// owns. The original sized this as one flat pool shared by all lists;
/// this crate gives each `List<T>` its own capacity, but keeps the same
/// default so behavior matches unless a caller opts into something else.
pub const LIST_MAX_NUM_NODES: usize = 1024;

/// Default maximum number of list headers a `Simulator` can allocate.
/// Unused by the slab-backed `List<T>` in this crate (headers are plain
/// owned values, not pool-allocated) but kept as a named constant because
/// callers migrating from the original interface expect it to exist.
pub const LIST_MAX_NUM_HEADS: usize = 32;

/// Number of semaphore slots, `sid ∈ 0..NUM_SEMAPHORE`.
pub const NUM_SEMAPHORE: usize = 5;

/// Number of priority-keyed ready queues (high, normal, low). The init
/// process is a sentinel, not a fourth ready queue — see §9 of the spec.
pub const NUM_READY_LIST: usize = 3;

/// Number of IPC wait queues (awaiting-receive, awaiting-reply).
pub const NUM_WAITING_LIST: usize = 2;
