//! Process control block and the small value types every other module
//! builds on: process identity, priority, run state, and the reason a
//! blocked process is blocked.
//!
//! Grounded on the original's `PCB_s` (pid, priority, state, send_msg,
//! reply_msg) with two additions this crate's design needs and the C
//! struct didn't: `wait_reason`, which distinguishes *why* a `Blocked`
//! process is blocked (the original left that implicit in which wait
//! queue it was threaded onto), and `residence`, which records *where* a
//! process currently lives so it can be detached in O(1) instead of
//! searched for (see the queue-membership witness note in the spec).

use std::fmt;

use crate::list::NodeId;

/// Process identifier. Pid 0 is reserved for the init process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub i32);

impl Pid {
    /// The permanent identity of the init process.
    pub const INIT: Pid = Pid(0);

    pub fn is_init(self) -> bool {
        self == Pid::INIT
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Semaphore identifier, `0..NUM_SEMAPHORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemId(pub i32);

impl fmt::Display for SemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduling priority. `Init` is not a ready-queue band; it marks the
/// one process that is never enqueued and is dispatched only when every
/// real ready queue is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Normal,
    Low,
    Init,
}

impl Priority {
    /// Parse the command-line priority code (`0`, `1`, `2`) used by
    /// `create`. `Init` is never produced by this path.
    pub fn from_code(code: i32) -> Option<Priority> {
        match code {
            0 => Some(Priority::High),
            1 => Some(Priority::Normal),
            2 => Some(Priority::Low),
            _ => None,
        }
    }

    /// The three real ready-queue bands, highest priority first.
    pub fn ready_bands() -> [Priority; 3] {
        [Priority::High, Priority::Normal, Priority::Low]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
            Priority::Init => "init",
        };
        write!(f, "{s}")
    }
}

/// Run state of a process, mirroring the original's `ProcessState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Ready,
    Blocked,
}

/// Why a `Blocked` process is blocked. The original tracked this only
/// implicitly (by which wait queue the PCB was linked onto); this crate
/// names it explicitly so introspection (`procinfo`) can report it
/// without re-deriving it from queue membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitReason {
    AwaitingReceive,
    AwaitingReply,
    AwaitingSemaphore(SemId),
}

/// Which single queue (or the current slot) a process presently
/// occupies. Every PCB lives in exactly one of these at a time; this is
/// the single-residence invariant made explicit as a type instead of an
/// implicit property of "which list contains this pid".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residence {
    Current,
    Ready(Priority),
    WaitSend,
    WaitReceive,
    WaitSem(SemId),
}

/// A message value moved between inbox and reply slots. Owned, not
/// shared: delivering a message is a move, never a copy-on-write or
/// reference-counted handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub source: Pid,
    pub text: String,
}

/// Process control block.
#[derive(Debug, Clone)]
pub struct Pcb {
    pub pid: Pid,
    pub priority: Priority,
    pub state: ProcessState,
    pub wait_reason: Option<WaitReason>,
    pub inbox_message: Option<Message>,
    pub reply_message: Option<Message>,
    pub residence: Residence,
    /// Handle into whichever queue `residence` names, so the scheduler
    /// can detach this PCB in O(1) rather than searching for it. `None`
    /// exactly when `residence == Residence::Current`.
    pub queue_node: Option<NodeId>,
}

impl Pcb {
    /// Construct a freshly-created, not-yet-queued PCB. Callers are
    /// expected to enqueue it (setting `residence`/`queue_node`)
    /// immediately afterward.
    pub fn new(pid: Pid, priority: Priority) -> Self {
        Self {
            pid,
            priority,
            state: ProcessState::Ready,
            wait_reason: None,
            inbox_message: None,
            reply_message: None,
            residence: Residence::Ready(priority),
            queue_node: None,
        }
    }

    /// Construct the permanent init process: pid 0, `Priority::Init`,
    /// immediately current, never queued.
    pub fn new_init() -> Self {
        Self {
            pid: Pid::INIT,
            priority: Priority::Init,
            state: ProcessState::Running,
            wait_reason: None,
            inbox_message: None,
            reply_message: None,
            residence: Residence::Current,
            queue_node: None,
        }
    }
}
