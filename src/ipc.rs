//! The two IPC wait queues: processes blocked inside `send` awaiting a
//! reply, and processes blocked inside `receive` awaiting a send.
//!
//! This module only owns the queueing structure, the same split
//! [`crate::scheduler`] makes between "where processes wait" and "what
//! decides to move them there" — the precondition checks and message
//! delivery that decide *when* a pid moves between these queues and the
//! process table live in [`crate::simulator`], which is the only place
//! that holds both the PCB table and these queues at once.

use crate::list::{List, ListExhausted, NodeId};
use crate::process::Pid;

pub struct IpcQueues {
    wait_send: List<Pid>,
    wait_receive: List<Pid>,
}

impl IpcQueues {
    pub fn new(capacity: usize) -> Self {
        Self {
            wait_send: List::new(capacity),
            wait_receive: List::new(capacity),
        }
    }

    pub fn enqueue_send(&mut self, pid: Pid) -> Result<NodeId, ListExhausted> {
        self.wait_send.append(pid)
    }

    pub fn enqueue_receive(&mut self, pid: Pid) -> Result<NodeId, ListExhausted> {
        self.wait_receive.append(pid)
    }

    pub fn detach_send(&mut self, node: NodeId) -> Pid {
        self.wait_send.detach(node)
    }

    pub fn detach_receive(&mut self, node: NodeId) -> Pid {
        self.wait_receive.detach(node)
    }

    pub fn is_receive_empty(&self) -> bool {
        self.wait_receive.is_empty()
    }

    /// Pop the longest-waiting receiver, if any (used by `send` when a
    /// target is already blocked in `receive`).
    pub fn take_first_receiver(&mut self) -> Option<Pid> {
        self.wait_receive.first()?;
        self.wait_receive.remove()
    }

    pub fn iter_wait_send(&self) -> impl Iterator<Item = &Pid> + '_ {
        self.wait_send.iter()
    }

    pub fn iter_wait_receive(&self) -> impl Iterator<Item = &Pid> + '_ {
        self.wait_receive.iter()
    }
}
