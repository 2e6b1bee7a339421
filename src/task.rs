use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

pub type TaskId = u64;
pub type WorkerId = usize;

// Every task, regardless of concrete kind, draws its identifier from this
// counter. It is the only state two task constructions can race on.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

/// Bookkeeping carried by every task: a unique identifier, the worker that
/// executed it, and the outcome of `perform` if it failed. Embed one in each
/// concrete task type and hand it out through `Task::meta`.
#[derive(Debug)]
pub struct TaskMeta {
    id: TaskId,
    worker: Option<WorkerId>,
    error: Option<Error>,
}

impl TaskMeta {
    /// Assigns the next identifier. Ids are process-wide, monotonic and
    /// never reused.
    pub fn new() -> TaskMeta {
        TaskMeta {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            worker: None,
            error: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The worker that executed this task, `None` until stamped.
    pub fn executing_worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub fn set_executing_worker(&mut self, worker: WorkerId) {
        self.worker = Some(worker);
    }

    /// The failure recorded by the executing worker, if `perform` failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: Error) {
        self.error = Some(error);
    }
}

impl Default for TaskMeta {
    fn default() -> Self {
        TaskMeta::new()
    }
}

/// One unit of work. A task is owned by exactly one party at a time: the
/// caller, a queue, or the worker executing it. The queues move ownership,
/// they never share it, so nothing here needs to be `Sync`.
pub trait Task: Send + 'static {
    fn meta(&self) -> &TaskMeta;

    fn meta_mut(&mut self) -> &mut TaskMeta;

    /// Perform this task. The default does nothing; concrete task kinds
    /// override it. A returned error is recorded on the task and relayed to
    /// the result queue, it never kills the worker.
    fn perform(&mut self) -> Result<()> {
        Ok(())
    }

    fn id(&self) -> TaskId {
        self.meta().id()
    }

    fn executing_worker(&self) -> Option<WorkerId> {
        self.meta().executing_worker()
    }
}
