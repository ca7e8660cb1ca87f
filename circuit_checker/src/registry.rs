// Task registry and per-tick scheduler.
//
// `TaskRegistry` owns every live `VerificationTask`. It is owned by whoever
// drives the ticks (the host loop) and touched only from that thread. New
// tasks arrive from other threads (the verifier's settle-delay timers)
// through a cloneable `TaskSender`, which pushes `SchedulerCommand`s onto an
// `mpsc` channel.
//
// `on_tick` does two things, in this order:
//
//   1. Drain the inbox. Every task sent before the drain becomes live now.
//   2. Advance every live task exactly once and drop the ones that retire.
//
// Because admission only happens at step 1, a task sent while a tick is in
// progress is simply picked up by the next tick's drain. A task is never
// advanced twice in one tick and never skipped once admitted. Tasks sent
// from the tick thread itself (`add_task`) take the same path, so there is
// one visibility rule for everyone.
//
// Within a tick, tasks are advanced in admission order. Tasks are
// independent, so nothing relies on that order.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, trace};

use crate::env::Environment;
use crate::error::VerifyError;
use crate::report::ReportSink;
use crate::task::{TaskId, VerificationTask};

/// Messages accepted by the registry's inbox.
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Admit a task at the start of the next tick.
    AddTask(VerificationTask),
}

/// Thread-safe handle for submitting tasks to a registry.
#[derive(Clone, Debug)]
pub struct TaskSender {
    tx: Sender<SchedulerCommand>,
}

impl TaskSender {
    /// Queue a task for admission. Fails only if the registry is gone.
    pub fn add_task(&self, task: VerificationTask) -> Result<(), VerifyError> {
        self.tx
            .send(SchedulerCommand::AddTask(task))
            .map_err(|_| VerifyError::SchedulerStopped)
    }
}

/// What one `on_tick` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Tasks drained from the inbox this tick.
    pub admitted: usize,
    /// Tasks advanced this tick (including newly admitted ones).
    pub advanced: usize,
    /// Tasks that retired this tick.
    pub retired: usize,
}

/// The set of live verification tasks.
pub struct TaskRegistry {
    tasks: Vec<VerificationTask>,
    inbox: Receiver<SchedulerCommand>,
    sender: TaskSender,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        let (tx, inbox) = mpsc::channel();
        Self {
            tasks: Vec::new(),
            inbox,
            sender: TaskSender { tx },
        }
    }

    /// A handle other threads can use to submit tasks.
    pub fn sender(&self) -> TaskSender {
        self.sender.clone()
    }

    /// Submit a task from the tick thread. It is admitted by the next
    /// `on_tick`, exactly like a task sent through a `TaskSender`.
    pub fn add_task(&self, task: VerificationTask) {
        let sent = self.sender.add_task(task);
        debug_assert!(sent.is_ok(), "registry inbox closed while the registry is alive");
    }

    /// Admit queued tasks, then advance every live task once.
    pub fn on_tick(&mut self, env: &mut dyn Environment, sink: &mut dyn ReportSink) -> TickSummary {
        let mut summary = TickSummary::default();

        while let Ok(SchedulerCommand::AddTask(task)) = self.inbox.try_recv() {
            debug!(task = %task.id(), player = %task.player(), "task admitted");
            self.tasks.push(task);
            summary.admitted += 1;
        }

        let before = self.tasks.len();
        self.tasks.retain_mut(|task| task.advance(env, sink));
        summary.advanced = before;
        summary.retired = before - self.tasks.len();

        if summary.retired > 0 {
            trace!(retired = summary.retired, live = self.tasks.len(), "tasks retired");
        }
        summary
    }

    /// Live tasks, in admission order.
    pub fn tasks(&self) -> impl Iterator<Item = &VerificationTask> {
        self.tasks.iter()
    }

    pub fn get(&self, id: TaskId) -> Option<&VerificationTask> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
