use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use slog::{error, o, warn, Discard, Logger};

use super::worker::Worker;
use super::{Config, IdleMode, Shared};
use crate::error::{Error, ErrorKind, Result};
use crate::task::Task;

/// The pool manager. Owns the request and result queues, spawns a fixed
/// number of workers, and exposes controlled shutdown. Tasks inserted before
/// or after `spawn` flow through the request queue to exactly one worker and
/// come back through the result queue for `process`.
pub struct Pool<T: Task> {
    shared: Arc<Shared<T>>,
    threads: Vec<JoinHandle<()>>,
    num_workers: usize,
    idle: IdleMode,
    spawned: bool,
    logger: Logger,
}

impl<T: Task> Pool<T> {
    pub fn new() -> Pool<T> {
        Pool::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Pool<T> {
        let logger = config
            .logger
            .unwrap_or_else(|| Logger::root(Discard, o!()));

        Pool {
            shared: Arc::new(Shared::new()),
            threads: Vec::new(),
            num_workers: config.workers,
            idle: config.idle,
            spawned: false,
            logger,
        }
    }

    /// Hand a task over to the request queue. Never fails; may be called
    /// before or interleaved with `spawn`.
    pub fn insert(&self, task: T) {
        self.shared.request.insert(task);
    }

    /// Start the worker threads. Spawning twice without tearing the pool
    /// down first is a misuse and is reported, not tolerated.
    pub fn spawn(&mut self) -> Result<()> {
        if self.spawned {
            return Err(Error::from(ErrorKind::AlreadySpawned));
        }
        self.spawned = true;

        if self.num_workers == 0 {
            warn!(
                self.logger,
                "pool has no workers, pending tasks will never run"
            );
        }

        for id in 0..self.num_workers {
            let worker = Worker::new(id, Arc::clone(&self.shared), self.idle, &self.logger);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker.run())?;
            self.threads.push(handle);
        }
        Ok(())
    }

    /// Block until every worker has terminated. Does not stop anything
    /// itself: under `IdleMode::Exit` workers leave when the request queue
    /// runs dry, under `IdleMode::Wait` they leave only after `force_exit`.
    /// Idempotent; a second call finds nothing left to join.
    pub fn wait(&mut self) {
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                // a crash inside perform is the caller's concern, the pool
                // does not restart workers
                error!(self.logger, "worker thread panicked");
            }
        }
    }

    /// Signal all workers to stop taking new tasks, then wait for them. A
    /// task already popped by a worker still completes and reaches the
    /// result queue. Idempotent.
    pub fn force_exit(&mut self) {
        self.shared.force_exit.store(true, Ordering::SeqCst);
        self.shared.request.close();
        self.wait();
    }

    /// Drain what is currently available in the result queue, handing each
    /// completed task to `hook` for disposal. Returns how many were drained.
    /// Calling this while workers are still running is legal but racy: late
    /// arrivals need a second call.
    pub fn process<F>(&self, mut hook: F) -> usize
    where
        F: FnMut(T),
    {
        let mut drained = 0;
        while let Some(task) = self.shared.result.try_remove_front() {
            hook(task);
            drained += 1;
        }
        drained
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Advisory count of tasks awaiting execution.
    pub fn pending(&self) -> usize {
        self.shared.request.len()
    }

    /// Advisory count of completed tasks awaiting `process`.
    pub fn completed(&self) -> usize {
        self.shared.result.len()
    }
}

impl<T: Task> Default for Pool<T> {
    fn default() -> Self {
        Pool::new()
    }
}

impl<T: Task> Drop for Pool<T> {
    // Safety net: stop the workers and discard whatever the caller never
    // waited for or processed. Reaching this with resident tasks means the
    // caller forgot to wait/process, so it is flagged.
    fn drop(&mut self) {
        self.shared.force_exit.store(true, Ordering::SeqCst);
        self.shared.request.close();
        self.wait();

        let unstarted = self.shared.request.flush();
        let unprocessed = self.shared.result.flush();
        if unstarted > 0 || unprocessed > 0 {
            warn!(
                self.logger,
                "discarding tasks at teardown";
                "unstarted" => unstarted,
                "unprocessed" => unprocessed
            );
        }
    }
}
