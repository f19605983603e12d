//! Error taxonomy for the simulator's primitive operations.
//!
//! Every fallible primitive in [`crate::simulator`] returns a `Result<_,
//! SimError>` rather than the boolean-style success/failure the original
//! command interface describes; the thin shell is the layer that collapses
//! a `Result` back down to `Success: …` / `Failure: …` text.

use thiserror::Error;

use crate::process::{Pid, SemId};

/// Everything that can make a primitive fail without mutating any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// `create` was given a priority outside `{0, 1, 2}`.
    #[error("priority {0} is not one of high(0), normal(1), low(2)")]
    InvalidPriority(i32),

    /// A semaphore command named an id outside `0..NUM_SEMAPHORE`.
    #[error("semaphore id {0} is out of range")]
    InvalidSemaphoreId(i32),

    /// `new_Sem` was given a negative initial value.
    #[error("semaphore initial value {0} is negative")]
    NegativeInitValue(i64),

    /// No PCB with this pid exists.
    #[error("no such process: pid {0}")]
    UnknownPid(Pid),

    /// `send`/`reply` named the caller itself as the target.
    #[error("process {0} cannot target itself")]
    TargetIsSelf(Pid),

    /// `reply`'s target is not currently blocked awaiting a reply.
    #[error("process {0} is not awaiting a reply")]
    TargetNotAwaitingReply(Pid),

    /// `send`'s target already has an undelivered message pending.
    #[error("process {0}'s inbox is already occupied")]
    InboxOccupied(Pid),

    /// `reply`'s target already has an undelivered reply pending.
    #[error("process {0}'s reply slot is already occupied")]
    ReplySlotOccupied(Pid),

    /// `send` from init would block init, which is disallowed.
    #[error("init cannot block in send; target {0} is not awaiting receive")]
    InitWouldBlockOnSend(Pid),

    /// `send` would deliver into a process already holding a send from the
    /// target (would-be immediate send/reply cycle).
    #[error("process {0} is already holding a message from the target")]
    SendCycle(Pid),

    /// `receive` was attempted by init with nothing in its inbox.
    #[error("init cannot block in receive")]
    InitWouldBlockOnReceive,

    /// `fork` or `kill` targeted the init process.
    #[error("the init process cannot be forked or killed")]
    InitIsProtected,

    /// `sem_P` was attempted by the init process.
    #[error("init cannot block on a semaphore")]
    InitWouldBlockOnSemaphore,

    /// The node pool backing the internal queues is exhausted.
    #[error("list node capacity exhausted")]
    ListExhausted,

    /// `new_Sem` named a semaphore that was already initialized.
    #[error("semaphore {0} is already initialized")]
    SemaphoreAlreadyInitialized(SemId),

    /// A semaphore primitive named a semaphore that has not been
    /// initialized with `new_Sem` yet.
    #[error("semaphore {0} has not been initialized")]
    SemaphoreNotInitialized(SemId),
}

/// Convenience alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;
