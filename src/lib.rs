//! kernelsim: a didactic process-control simulator.
//!
//! Models the kernel-level bookkeeping of a small preemptive
//! multiprogramming operating system — process creation, priority
//! scheduling, synchronous inter-process messaging with reply semantics,
//! and counting semaphores — driven by eleven primitive operations
//! exposed through [`Simulator`].
//!
//! The simulator itself is single-threaded and non-preemptive at the
//! implementation level: each primitive runs to completion before the
//! next command is read. There is no global/static simulator state and
//! no locking; a caller owns a `Simulator` value directly.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod ipc;
pub mod list;
pub mod process;
pub mod scheduler;
pub mod semaphore;
pub mod simulator;

pub use error::{SimError, SimResult};
pub use process::{Message, Pcb, Pid, Priority, ProcessState, Residence, SemId, WaitReason};
pub use simulator::{ProcInfo, ProcSnapshot, Report, SemInfo, Simulator, TotalInfo};

/// Crate version, exposed the way a CLI's `--version` flag reports it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
