use std::sync::atomic::Ordering;
use std::sync::Arc;

use slog::{debug, o, Logger};

use super::{IdleMode, Shared};
use crate::task::{Task, WorkerId};

/// One worker execution loop. Owns a task only for the duration of a single
/// execution step; everything else it touches lives in the shared context.
pub(crate) struct Worker<T: Task> {
    id: WorkerId,
    shared: Arc<Shared<T>>,
    idle: IdleMode,
    logger: Logger,
}

impl<T: Task> Worker<T> {
    pub fn new(id: WorkerId, shared: Arc<Shared<T>>, idle: IdleMode, logger: &Logger) -> Worker<T> {
        let logger = logger.new(o!("worker" => id));
        Worker {
            id,
            shared,
            idle,
            logger,
        }
    }

    pub fn run(mut self) {
        debug!(self.logger, "worker starting up");

        loop {
            if self.shared.force_exit.load(Ordering::SeqCst) {
                break;
            }

            let task = match self.idle {
                IdleMode::Wait => self.shared.request.remove_front_blocking(),
                IdleMode::Exit => self.shared.request.try_remove_front(),
            };

            // Wait mode returns None only once the pool is shut down; Exit
            // mode treats an empty queue as end-of-work. Either way, done.
            match task {
                Some(task) => self.execute(task),
                None => break,
            }
        }

        debug!(self.logger, "worker shutting down");
    }

    // A force-exit observed after the pop still lets this task finish and
    // reach the result queue; the signal is checked between tasks only.
    fn execute(&mut self, mut task: T) {
        debug!(self.logger, "starting task"; "task" => task.id());
        task.meta_mut().set_executing_worker(self.id);

        if let Err(e) = task.perform() {
            debug!(self.logger, "task failed"; "task" => task.id(), "error" => %e);
            task.meta_mut().set_error(e);
        }

        debug!(self.logger, "finished task"; "task" => task.id());
        self.shared.result.insert(task);
    }
}
