use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use slog::Logger;

use crate::error::{Error, ErrorKind};
use crate::queue::Queue;
use crate::task::Task;

mod manager;
mod worker;

pub use manager::Pool;

/// What a worker does when the request queue is momentarily empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleMode {
    /// Park on the queue until work arrives or the pool is shut down.
    /// Workers in this mode only terminate through `force_exit`.
    Wait,
    /// Treat an empty queue as end-of-work and terminate.
    Exit,
}

impl FromStr for IdleMode {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wait" => Ok(IdleMode::Wait),
            "exit" => Ok(IdleMode::Exit),
            _ => Err(Error::from(ErrorKind::Config(format!(
                "idle mode should be either wait or exit, got {}",
                s
            )))),
        }
    }
}

pub struct Config {
    /// Number of worker threads. Zero is tolerated but such a pool never
    /// completes pending tasks.
    pub workers: usize,
    pub idle: IdleMode,
    /// `None` discards all lifecycle trace output.
    pub logger: Option<Logger>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            // leave one core for the calling thread
            workers: num_cpus::get().saturating_sub(1),
            idle: IdleMode::Exit,
            logger: None,
        }
    }
}

// The state shared between the manager and its workers: the two queues and
// the shutdown flag. Workers hold an Arc to it and nothing else.
pub(crate) struct Shared<T: Task> {
    pub request: Queue<T>,
    pub result: Queue<T>,
    pub force_exit: AtomicBool,
}

impl<T: Task> Shared<T> {
    pub fn new() -> Shared<T> {
        Shared {
            request: Queue::new(),
            result: Queue::new(),
            force_exit: AtomicBool::new(false),
        }
    }
}
