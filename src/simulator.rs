//! The top-level simulator: process table, scheduler, IPC queues, and
//! semaphore table wired together behind the eleven primitive operations
//! and the two introspection queries.
//!
//! Unlike the teacher's global `static SCHEDULER: Mutex<Scheduler>` (see
//! `process::scheduler`), `Simulator` is a plain owned struct with no
//! interior mutability and no global state. The simulated model is
//! single-threaded and non-preemptive by definition — every primitive
//! runs to completion before the next is read — so there is nothing a
//! lock would protect against; an embedded `Mutex` here would just be
//! dead weight copied from a concurrent design this one isn't.

use std::collections::HashMap;

use crate::config::{LIST_MAX_NUM_NODES, NUM_SEMAPHORE};
use crate::error::{SimError, SimResult};
use crate::ipc::IpcQueues;
use crate::process::{Message, Pcb, Pid, Priority, ProcessState, Residence, SemId, WaitReason};
use crate::scheduler::Scheduler;
use crate::semaphore::{ProceedOrBlock, Semaphore};

/// A process's identity, priority, and run state at a point in time —
/// the minimal snapshot a scheduling notification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcSnapshot {
    pub pid: Pid,
    pub priority: Priority,
    pub state: ProcessState,
}

/// Everything a successful primitive reports about the scheduling it
/// caused, alongside the `Ok(())`-style success the original interface
/// describes. Every field besides the one(s) relevant to the primitive
/// that produced it is `None`.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// The process that stopped being current (blocked or exited).
    pub expired: Option<ProcSnapshot>,
    /// The process the scheduler installed as current, if dispatch ran.
    pub new_current: Option<ProcSnapshot>,
    /// A process moved from a wait queue to a ready queue (or straight
    /// to current), if this primitive unblocked one.
    pub unblocked: Option<ProcSnapshot>,
    /// A send message handed to a receiver inline (already waiting).
    pub delivered_message: Option<Message>,
    /// A reply handed to its sender at dispatch time.
    pub delivered_reply: Option<Message>,
}

/// Full PCB snapshot returned by `procinfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcInfo {
    pub pid: Pid,
    pub priority: Priority,
    pub state: ProcessState,
    pub wait_reason: Option<WaitReason>,
    pub inbox_message: Option<Message>,
    pub reply_message: Option<Message>,
}

/// One semaphore's snapshot within a `totalinfo` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemInfo {
    pub sid: SemId,
    pub value: i64,
    pub waiters: Vec<ProcInfo>,
}

/// Full simulator snapshot returned by `totalinfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalInfo {
    pub current: ProcInfo,
    pub ready: Vec<ProcInfo>,
    pub waiting_send: Vec<ProcInfo>,
    pub waiting_receive: Vec<ProcInfo>,
    pub semaphores: Vec<SemInfo>,
}

struct DispatchOutcome {
    new_current: Pid,
    delivered_reply: Option<Message>,
}

/// The simulator. Owns every piece of global state the spec describes:
/// the process table, the three-priority scheduler, the two IPC wait
/// queues, and the five semaphore slots.
pub struct Simulator {
    processes: HashMap<Pid, Pcb>,
    next_pid: i32,
    scheduler: Scheduler,
    ipc: IpcQueues,
    semaphores: [Semaphore; NUM_SEMAPHORE],
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Build a simulator with the default list-node capacity
    /// ([`LIST_MAX_NUM_NODES`]) for every queue.
    pub fn new() -> Self {
        Self::with_capacity(LIST_MAX_NUM_NODES)
    }

    /// Build a simulator whose every internal queue has room for
    /// `node_capacity` processes. Smaller capacities are useful in tests
    /// that want to exercise the exhaustion path.
    pub fn with_capacity(node_capacity: usize) -> Self {
        let mut processes = HashMap::new();
        processes.insert(Pid::INIT, Pcb::new_init());
        Self {
            processes,
            next_pid: 1,
            scheduler: Scheduler::new(node_capacity),
            ipc: IpcQueues::new(node_capacity),
            semaphores: std::array::from_fn(|_| Semaphore::new(node_capacity)),
        }
    }

    fn alloc_pid(&mut self) -> Pid {
        let pid = Pid(self.next_pid);
        self.next_pid += 1;
        pid
    }

    fn snapshot(&self, pid: Pid) -> ProcSnapshot {
        let pcb = &self.processes[&pid];
        ProcSnapshot {
            pid: pcb.pid,
            priority: pcb.priority,
            state: pcb.state,
        }
    }

    fn semaphore(&self, sid: SemId) -> &Semaphore {
        &self.semaphores[sid.0 as usize]
    }

    fn semaphore_mut(&mut self, sid: SemId) -> &mut Semaphore {
        &mut self.semaphores[sid.0 as usize]
    }

    fn validate_sem_id(&self, sid_arg: i32) -> SimResult<SemId> {
        if sid_arg < 0 || sid_arg as usize >= NUM_SEMAPHORE {
            return Err(SimError::InvalidSemaphoreId(sid_arg));
        }
        Ok(SemId(sid_arg))
    }

    /// Demote the init PCB out of the current slot into its idle,
    /// always-selectable resting state. Init is never enqueued on any
    /// real ready list (see the scheduler's fallback in `next_process`);
    /// this just updates its own bookkeeping fields to match.
    fn demote_init_to_idle(&mut self) {
        let init = self.processes.get_mut(&Pid::INIT).expect("init always present");
        init.state = ProcessState::Ready;
        init.residence = Residence::Ready(Priority::Init);
        init.queue_node = None;
    }

    fn set_ready(&mut self, pid: Pid, priority: Priority) -> Result<(), SimError> {
        let node = self
            .scheduler
            .enqueue(priority, pid)
            .map_err(|_| SimError::ListExhausted)?;
        let pcb = self.processes.get_mut(&pid).expect("pid in table");
        pcb.state = ProcessState::Ready;
        pcb.residence = Residence::Ready(priority);
        pcb.queue_node = Some(node);
        Ok(())
    }

    fn set_wait_send(&mut self, pid: Pid) -> Result<(), SimError> {
        let node = self.ipc.enqueue_send(pid).map_err(|_| SimError::ListExhausted)?;
        let pcb = self.processes.get_mut(&pid).expect("pid in table");
        pcb.state = ProcessState::Blocked;
        pcb.wait_reason = Some(WaitReason::AwaitingReply);
        pcb.residence = Residence::WaitSend;
        pcb.queue_node = Some(node);
        Ok(())
    }

    fn set_wait_receive(&mut self, pid: Pid) -> Result<(), SimError> {
        let node = self.ipc.enqueue_receive(pid).map_err(|_| SimError::ListExhausted)?;
        let pcb = self.processes.get_mut(&pid).expect("pid in table");
        pcb.state = ProcessState::Blocked;
        pcb.wait_reason = Some(WaitReason::AwaitingReceive);
        pcb.residence = Residence::WaitReceive;
        pcb.queue_node = Some(node);
        Ok(())
    }

    fn install_dispatched(&mut self, pid: Pid) -> DispatchOutcome {
        let delivered_reply = self
            .processes
            .get_mut(&pid)
            .expect("dispatch target exists")
            .reply_message
            .take();
        {
            let pcb = self.processes.get_mut(&pid).expect("dispatch target exists");
            pcb.state = ProcessState::Running;
            pcb.residence = Residence::Current;
            pcb.queue_node = None;
        }
        tracing::info!(
            pid = pid.0,
            delivered_reply = delivered_reply.is_some(),
            "dispatch"
        );
        DispatchOutcome {
            new_current: pid,
            delivered_reply,
        }
    }

    fn dispatch(&mut self) -> DispatchOutcome {
        let pid = self.scheduler.next_process();
        self.install_dispatched(pid)
    }

    fn fold_dispatch(&self, report: &mut Report, outcome: DispatchOutcome) {
        report.new_current = Some(self.snapshot(outcome.new_current));
        report.delivered_reply = outcome.delivered_reply;
    }

    /// `create(priority)`: allocate a PCB. Preempts init directly if init
    /// is current; otherwise joins the tail of its priority's ready
    /// queue (never preempting a real running process — see scenario 2
    /// of the testable-properties section).
    pub fn create(&mut self, priority_code: i32) -> SimResult<(Pid, Report)> {
        let priority =
            Priority::from_code(priority_code).ok_or(SimError::InvalidPriority(priority_code))?;
        let pid = self.alloc_pid();
        let preempting_init = self.scheduler.current().is_init();
        self.processes.insert(pid, Pcb::new(pid, priority));

        let mut report = Report::default();
        if preempting_init {
            self.demote_init_to_idle();
            {
                let pcb = self.processes.get_mut(&pid).expect("just inserted");
                pcb.state = ProcessState::Running;
                pcb.residence = Residence::Current;
            }
            self.scheduler.install_current(pid);
            report.new_current = Some(self.snapshot(pid));
            tracing::info!(pid = pid.0, priority = %priority, "create preempted init");
        } else {
            self.set_ready(pid, priority)?;
            tracing::info!(pid = pid.0, priority = %priority, "create enqueued");
        }
        Ok((pid, report))
    }

    /// `fork()`: duplicate the current process's priority into a fresh
    /// PCB with empty message slots, enqueued as ready. Disallowed for
    /// init.
    pub fn fork(&mut self) -> SimResult<(Pid, Report)> {
        let current = self.scheduler.current();
        if current.is_init() {
            return Err(SimError::InitIsProtected);
        }
        let priority = self.processes[&current].priority;
        let pid = self.alloc_pid();
        self.processes.insert(pid, Pcb::new(pid, priority));
        self.set_ready(pid, priority)?;
        tracing::info!(parent = current.0, child = pid.0, "fork");
        Ok((pid, Report::default()))
    }

    fn kill_current(&mut self, pid: Pid) -> SimResult<Report> {
        let snap = self.snapshot(pid);
        self.processes.remove(&pid);
        let mut report = Report {
            expired: Some(snap),
            ..Report::default()
        };
        let outcome = self.dispatch();
        self.fold_dispatch(&mut report, outcome);
        tracing::info!(pid = pid.0, "exit");
        Ok(report)
    }

    /// `kill(pid)`: destroy a PCB wherever it resides. Disallowed for
    /// init; fails if no such pid exists.
    pub fn kill(&mut self, pid_arg: i32) -> SimResult<Report> {
        let target = Pid(pid_arg);
        if target.is_init() {
            return Err(SimError::InitIsProtected);
        }
        if !self.processes.contains_key(&target) {
            return Err(SimError::UnknownPid(target));
        }
        if self.scheduler.current() == target {
            return self.kill_current(target);
        }

        let residence = self.processes[&target].residence;
        let queue_node = self.processes[&target].queue_node;
        match residence {
            Residence::Ready(priority) => {
                let node = queue_node.expect("ready pcb carries a queue node");
                self.scheduler.detach(priority, node);
            }
            Residence::WaitSend => {
                let node = queue_node.expect("waiting pcb carries a queue node");
                self.ipc.detach_send(node);
            }
            Residence::WaitReceive => {
                let node = queue_node.expect("waiting pcb carries a queue node");
                self.ipc.detach_receive(node);
            }
            Residence::WaitSem(sid) => {
                let node = queue_node.expect("waiting pcb carries a queue node");
                // Removing a semaphore waiter credits the value back —
                // see the kill/semaphore open question in the design notes.
                self.semaphore_mut(sid).remove_waiter(node);
            }
            Residence::Current => unreachable!("handled by kill_current above"),
        }
        self.processes.remove(&target);
        tracing::info!(pid = target.0, "kill");
        Ok(Report::default())
    }

    /// `exit_proc()`: equivalent to killing the current process.
    /// Disallowed for init.
    pub fn exit_proc(&mut self) -> SimResult<Report> {
        let current = self.scheduler.current();
        if current.is_init() {
            return Err(SimError::InitIsProtected);
        }
        self.kill_current(current)
    }

    /// `quantum()`: round-robin the current process within its priority
    /// band. A no-op for init, which has no band to cycle within.
    pub fn quantum(&mut self) -> SimResult<Report> {
        let current = self.scheduler.current();
        let priority = self.processes[&current].priority;
        if matches!(priority, Priority::Init) {
            tracing::debug!("quantum is a no-op while init is current");
            return Ok(Report::default());
        }

        let (node, new_pid) = self
            .scheduler
            .quantum(priority)
            .map_err(|_| SimError::ListExhausted)?;
        {
            let pcb = self.processes.get_mut(&current).expect("current exists");
            pcb.state = ProcessState::Ready;
            pcb.residence = Residence::Ready(priority);
            pcb.queue_node = Some(node);
        }
        let mut report = Report {
            expired: Some(self.snapshot(current)),
            ..Report::default()
        };
        let outcome = self.install_dispatched(new_pid);
        self.fold_dispatch(&mut report, outcome);
        tracing::info!(pid = current.0, "quantum expired");
        Ok(report)
    }

    /// `send(target, msg)`: deliver a message into the target's inbox,
    /// unblocking it if it was already waiting in `receive`, then block
    /// the caller awaiting a reply. If the caller is init, the
    /// precondition below guarantees the target was already blocked in
    /// `receive`; init installs it directly as current instead of
    /// blocking itself in `wait_send`, since init can never occupy a wait
    /// queue (§3).
    pub fn send(&mut self, target_arg: i32, text: impl Into<String>) -> SimResult<Report> {
        let current = self.scheduler.current();
        let target = Pid(target_arg);
        if target == current {
            return Err(SimError::TargetIsSelf(current));
        }
        if !self.processes.contains_key(&target) {
            return Err(SimError::UnknownPid(target));
        }
        if self.processes[&target].inbox_message.is_some() {
            return Err(SimError::InboxOccupied(target));
        }
        let target_awaiting_receive = matches!(self.processes[&target].residence, Residence::WaitReceive);
        if current.is_init() && !target_awaiting_receive {
            return Err(SimError::InitWouldBlockOnSend(current));
        }
        if let Some(inbox) = &self.processes[&current].inbox_message {
            if inbox.source == target {
                return Err(SimError::SendCycle(target));
            }
        }

        let text = text.into();
        self.processes.get_mut(&target).expect("checked above").inbox_message =
            Some(Message { source: current, text });

        let mut report = Report::default();

        // Init can never be parked on a wait queue (spec §3). The
        // precondition above already guarantees `target_awaiting_receive`
        // whenever `current` is init, so hand control to the target
        // directly instead of blocking init in `wait_send` and letting
        // `dispatch` choose among the ready queues — mirroring the
        // `demote_init_to_idle`/`install_current` pattern `sem_v` uses for
        // the same reason.
        if current.is_init() {
            let node = self.processes[&target]
                .queue_node
                .expect("waiting pcb carries a queue node");
            self.ipc.detach_receive(node);
            {
                let pcb = self.processes.get_mut(&target).expect("checked above");
                pcb.state = ProcessState::Running;
                pcb.wait_reason = None;
                pcb.residence = Residence::Current;
                pcb.queue_node = None;
            }
            self.demote_init_to_idle();
            self.scheduler.install_current(target);
            report.new_current = Some(self.snapshot(target));
            tracing::info!(from = current.0, to = target.0, "send delivered, init yielded directly");
            return Ok(report);
        }

        if target_awaiting_receive {
            let node = self.processes[&target]
                .queue_node
                .expect("waiting pcb carries a queue node");
            self.ipc.detach_receive(node);
            let priority = self.processes[&target].priority;
            self.set_ready(target, priority)?;
            report.unblocked = Some(self.snapshot(target));
            tracing::info!(pid = target.0, "receive unblocked by send");
        }

        self.set_wait_send(current)?;
        report.expired = Some(self.snapshot(current));

        let outcome = self.dispatch();
        self.fold_dispatch(&mut report, outcome);
        tracing::info!(from = current.0, to = target.0, "send");
        Ok(report)
    }

    /// `receive()`: consume a pending inbox message if present, otherwise
    /// block awaiting one. Disallowed for init with an empty inbox.
    pub fn receive(&mut self) -> SimResult<Report> {
        let current = self.scheduler.current();
        let has_pending = self.processes[&current].inbox_message.is_some();
        if current.is_init() && !has_pending {
            return Err(SimError::InitWouldBlockOnReceive);
        }

        let mut report = Report::default();
        if has_pending {
            let msg = self
                .processes
                .get_mut(&current)
                .expect("current exists")
                .inbox_message
                .take();
            report.delivered_message = msg;
            tracing::info!(pid = current.0, "receive delivered pending inbox message");
            return Ok(report);
        }

        self.set_wait_receive(current)?;
        report.expired = Some(self.snapshot(current));
        let outcome = self.dispatch();
        self.fold_dispatch(&mut report, outcome);
        tracing::info!(pid = current.0, "receive blocked");
        Ok(report)
    }

    /// `reply(target, msg)`: deposit a reply into a sender's reply slot
    /// and move it from `wait_send` to ready. The reply is not actually
    /// displayed until the scheduler dispatches the target as current.
    pub fn reply(&mut self, target_arg: i32, text: impl Into<String>) -> SimResult<Report> {
        let current = self.scheduler.current();
        let target = Pid(target_arg);
        if target == current {
            return Err(SimError::TargetIsSelf(current));
        }
        let target_pcb = self.processes.get(&target).ok_or(SimError::UnknownPid(target))?;
        if !matches!(target_pcb.wait_reason, Some(WaitReason::AwaitingReply)) {
            return Err(SimError::TargetNotAwaitingReply(target));
        }
        if target_pcb.reply_message.is_some() {
            return Err(SimError::ReplySlotOccupied(target));
        }

        let text = text.into();
        self.processes.get_mut(&target).expect("checked above").reply_message =
            Some(Message { source: current, text });

        let node = self.processes[&target]
            .queue_node
            .expect("waiting pcb carries a queue node");
        self.ipc.detach_send(node);
        let priority = self.processes[&target].priority;
        self.set_ready(target, priority)?;

        let report = Report {
            unblocked: Some(self.snapshot(target)),
            ..Report::default()
        };
        tracing::info!(from = current.0, to = target.0, "reply enqueued");
        Ok(report)
    }

    /// `new_Sem(sid, init)`: initialize a semaphore slot. Fails if
    /// already initialized or given a negative starting value.
    pub fn new_sem(&mut self, sid_arg: i32, init_value: i64) -> SimResult<Report> {
        let sid = self.validate_sem_id(sid_arg)?;
        if self.semaphore(sid).is_initialized() {
            return Err(SimError::SemaphoreAlreadyInitialized(sid));
        }
        if init_value < 0 {
            return Err(SimError::NegativeInitValue(init_value));
        }
        self.semaphore_mut(sid).initialize(init_value);
        tracing::info!(sid = sid.0, init_value, "new_Sem");
        Ok(Report::default())
    }

    /// `sem_P(sid)`: classic P; blocks the caller if the post-decrement
    /// value went negative. Disallowed for init.
    pub fn sem_p(&mut self, sid_arg: i32) -> SimResult<Report> {
        let sid = self.validate_sem_id(sid_arg)?;
        if !self.semaphore(sid).is_initialized() {
            return Err(SimError::SemaphoreNotInitialized(sid));
        }
        let current = self.scheduler.current();
        if current.is_init() {
            return Err(SimError::InitWouldBlockOnSemaphore);
        }

        let mut report = Report::default();
        match self
            .semaphore_mut(sid)
            .p(current)
            .map_err(|_| SimError::ListExhausted)?
        {
            ProceedOrBlock::Proceed => {
                tracing::debug!(sid = sid.0, pid = current.0, "sem_P proceeded");
            }
            ProceedOrBlock::Blocked(node) => {
                {
                    let pcb = self.processes.get_mut(&current).expect("current exists");
                    pcb.state = ProcessState::Blocked;
                    pcb.wait_reason = Some(WaitReason::AwaitingSemaphore(sid));
                    pcb.residence = Residence::WaitSem(sid);
                    pcb.queue_node = Some(node);
                }
                report.expired = Some(self.snapshot(current));
                let outcome = self.dispatch();
                self.fold_dispatch(&mut report, outcome);
                tracing::info!(sid = sid.0, pid = current.0, "sem_P blocked");
            }
        }
        Ok(report)
    }

    /// `sem_V(sid)`: classic V; wakes the longest-waiting blocked process
    /// if any. If init is current, the waiter is installed directly as
    /// current rather than merely enqueued, since init has nothing else
    /// to preempt.
    pub fn sem_v(&mut self, sid_arg: i32) -> SimResult<Report> {
        let sid = self.validate_sem_id(sid_arg)?;
        if !self.semaphore(sid).is_initialized() {
            return Err(SimError::SemaphoreNotInitialized(sid));
        }

        let mut report = Report::default();
        if let Some(woken) = self.semaphore_mut(sid).v() {
            let priority = self.processes[&woken].priority;
            self.processes.get_mut(&woken).expect("woken exists").wait_reason = None;

            if self.scheduler.current().is_init() {
                {
                    let pcb = self.processes.get_mut(&woken).expect("woken exists");
                    pcb.state = ProcessState::Running;
                    pcb.residence = Residence::Current;
                    pcb.queue_node = None;
                }
                self.demote_init_to_idle();
                self.scheduler.install_current(woken);
                report.new_current = Some(self.snapshot(woken));
            } else {
                self.set_ready(woken, priority)?;
                report.unblocked = Some(self.snapshot(woken));
            }
            tracing::info!(sid = sid.0, pid = woken.0, "sem_V woke a waiter");
        } else {
            tracing::debug!(sid = sid.0, "sem_V had no waiter to wake");
        }
        Ok(report)
    }

    /// `procinfo(pid)`: full snapshot of one PCB, current or init
    /// included.
    pub fn procinfo(&self, pid_arg: i32) -> SimResult<ProcInfo> {
        let pid = Pid(pid_arg);
        let pcb = self.processes.get(&pid).ok_or(SimError::UnknownPid(pid))?;
        tracing::debug!(pid = pid.0, "procinfo");
        Ok(ProcInfo {
            pid: pcb.pid,
            priority: pcb.priority,
            state: pcb.state,
            wait_reason: pcb.wait_reason,
            inbox_message: pcb.inbox_message.clone(),
            reply_message: pcb.reply_message.clone(),
        })
    }

    /// `totalinfo()`: current process, every ready queue, both IPC wait
    /// queues, and every initialized semaphore's wait queue, in order.
    pub fn totalinfo(&self) -> TotalInfo {
        let current = self
            .procinfo(self.scheduler.current().0)
            .expect("current pid always exists");

        let mut ready = Vec::new();
        for priority in Priority::ready_bands() {
            for pid in self.scheduler.iter_ready(priority) {
                ready.push(self.procinfo(pid.0).expect("queued pid always exists"));
            }
        }

        let waiting_send = self
            .ipc
            .iter_wait_send()
            .map(|pid| self.procinfo(pid.0).expect("queued pid always exists"))
            .collect();
        let waiting_receive = self
            .ipc
            .iter_wait_receive()
            .map(|pid| self.procinfo(pid.0).expect("queued pid always exists"))
            .collect();

        let mut semaphores = Vec::new();
        for i in 0..NUM_SEMAPHORE {
            let sem = &self.semaphores[i];
            if sem.is_initialized() {
                let waiters = sem
                    .iter_waiters()
                    .map(|pid| self.procinfo(pid.0).expect("queued pid always exists"))
                    .collect();
                semaphores.push(SemInfo {
                    sid: SemId(i as i32),
                    value: sem.value(),
                    waiters,
                });
            }
        }

        tracing::debug!("totalinfo");
        TotalInfo {
            current,
            ready,
            waiting_send,
            waiting_receive,
            semaphores,
        }
    }

    /// The pid of whatever process is presently dispatched as current.
    /// Exposed for the shell and for test assertions, not a primitive of
    /// its own.
    pub fn current_pid(&self) -> Pid {
        self.scheduler.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_create_preempts_init() {
        let mut sim = Simulator::new();
        assert_eq!(sim.current_pid(), Pid::INIT);
        let (pid, report) = sim.create(1).unwrap();
        assert_eq!(pid, Pid(1));
        assert_eq!(sim.current_pid(), Pid(1));
        assert_eq!(report.new_current.unwrap().pid, Pid(1));
        assert_eq!(sim.procinfo(0).unwrap().state, ProcessState::Ready);
    }

    #[test]
    fn scenario_2_priority_preemption_only_at_quantum() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1, normal, becomes current
        assert_eq!(sim.current_pid(), Pid(1));

        let (pid2, _) = sim.create(0).unwrap(); // pid 2, high — enqueued only
        assert_eq!(pid2, Pid(2));
        assert_eq!(sim.current_pid(), Pid(1));

        let report = sim.quantum().unwrap();
        assert_eq!(sim.current_pid(), Pid(2));
        assert_eq!(report.expired.unwrap().pid, Pid(1));
        assert_eq!(report.new_current.unwrap().pid, Pid(2));
    }

    #[test]
    fn scenario_3_send_receive_handshake() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1 current
        sim.create(1).unwrap(); // pid 2 ready
        sim.quantum().unwrap(); // pid 2 current now
        assert_eq!(sim.current_pid(), Pid(2));

        let report = sim.send(1, "hi").unwrap();
        assert_eq!(sim.current_pid(), Pid(1));
        assert_eq!(report.expired.unwrap().pid, Pid(2));

        let report = sim.receive().unwrap();
        let msg = report.delivered_message.unwrap();
        assert_eq!(msg.source, Pid(2));
        assert_eq!(msg.text, "hi");
        assert_eq!(sim.current_pid(), Pid(1)); // receiver kept running
        assert_eq!(
            sim.procinfo(2).unwrap().wait_reason,
            Some(WaitReason::AwaitingReply)
        );
    }

    #[test]
    fn scenario_4_reply_completes_the_handshake() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1
        sim.create(1).unwrap(); // pid 2
        sim.quantum().unwrap(); // current = pid 2
        sim.send(1, "hi").unwrap(); // current = pid 1
        sim.receive().unwrap();

        sim.reply(2, "ok").unwrap();
        assert_eq!(
            sim.procinfo(2).unwrap().state,
            ProcessState::Ready
        );

        // pid 1 quantums away so pid 2 is dispatched and its reply delivered.
        let report = sim.quantum().unwrap();
        assert_eq!(sim.current_pid(), Pid(2));
        let reply = report.delivered_reply.unwrap();
        assert_eq!(reply.source, Pid(1));
        assert_eq!(reply.text, "ok");
        assert!(sim.procinfo(2).unwrap().reply_message.is_none());
    }

    #[test]
    fn scenario_5_semaphore_blocking_and_wake() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1 current
        sim.new_sem(0, 1).unwrap();

        let r1 = sim.sem_p(0).unwrap();
        assert!(r1.expired.is_none()); // proceeded, didn't block
        assert_eq!(sim.procinfo(1).unwrap().state, ProcessState::Running);

        let r2 = sim.sem_p(0).unwrap();
        assert_eq!(r2.expired.unwrap().pid, Pid(1));
        assert_eq!(sim.current_pid(), Pid::INIT); // nobody else ready

        let r3 = sim.sem_v(0).unwrap();
        assert_eq!(r3.new_current.unwrap().pid, Pid(1)); // init installs waiter directly
        assert_eq!(sim.current_pid(), Pid(1));
    }

    #[test]
    fn scenario_6_kill_in_a_wait_queue() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1 current
        sim.create(1).unwrap(); // pid 2 ready
        sim.quantum().unwrap(); // current = pid 2
        sim.receive().unwrap(); // pid 2 blocks on receive (no inbox), dispatch -> pid 1
        assert_eq!(sim.current_pid(), Pid(1));
        assert_eq!(sim.procinfo(2).unwrap().state, ProcessState::Blocked);

        sim.kill(2).unwrap();
        assert_eq!(sim.current_pid(), Pid(1)); // unchanged
        assert!(sim.procinfo(2).is_err());
    }

    #[test]
    fn kill_removing_a_semaphore_waiter_credits_the_value_back() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1
        sim.new_sem(0, 0).unwrap();
        sim.sem_p(0).unwrap(); // pid 1 blocks, value -1, dispatch -> init
        sim.kill(1).unwrap();
        sim.new_sem(1, 0).unwrap(); // harmless second semaphore, ensures state still consistent
        let info = sim.totalinfo();
        assert!(info.semaphores.iter().find(|s| s.sid == SemId(0)).unwrap().value == 0);
    }

    #[test]
    fn invalid_priority_is_rejected_without_mutation() {
        let mut sim = Simulator::new();
        assert_eq!(sim.create(9), Err(SimError::InvalidPriority(9)));
        assert_eq!(sim.current_pid(), Pid::INIT);
    }

    #[test]
    fn send_to_self_is_rejected() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap();
        assert_eq!(sim.send(1, "x"), Err(SimError::TargetIsSelf(Pid(1))));
    }

    #[test]
    fn forking_and_killing_init_is_disallowed() {
        let mut sim = Simulator::new();
        assert_eq!(sim.fork(), Err(SimError::InitIsProtected));
        assert_eq!(sim.kill(0), Err(SimError::InitIsProtected));
    }

    #[test]
    fn init_send_to_a_blocked_receiver_never_parks_init_on_a_wait_queue() {
        let mut sim = Simulator::new();
        sim.create(1).unwrap(); // pid 1 current
        sim.receive().unwrap(); // pid 1 blocks awaiting receive, dispatch falls back to init
        assert_eq!(sim.current_pid(), Pid::INIT);

        let report = sim.send(1, "hi").unwrap();
        assert_eq!(sim.current_pid(), Pid(1)); // target installed directly, init never blocked
        assert_eq!(report.new_current.unwrap().pid, Pid(1));
        assert_eq!(sim.procinfo(0).unwrap().state, ProcessState::Ready);
        assert_eq!(sim.procinfo(0).unwrap().wait_reason, None);

        // Init is immediately usable again: it was never corrupted into a
        // permanently unkillable `AwaitingReply` state (the bug this guards
        // against would have let this `reply` reach `set_ready` with
        // `Priority::Init` and panic).
        let reply_report = sim.reply(0, "ok");
        assert_eq!(reply_report, Err(SimError::TargetNotAwaitingReply(Pid(0))));
    }
}
