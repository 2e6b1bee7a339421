//! A fixed-size worker pool. Callers define a task type, insert tasks into
//! the pool, spawn workers to drain them, then process the completed tasks.

pub use error::{Error, ErrorKind, Result};
pub use pool::{Config, IdleMode, Pool};
pub use task::{Task, TaskId, TaskMeta, WorkerId};
pub use timer::{format_duration, Timer};

pub mod error;
pub mod pool;
pub mod queue;
pub mod task;
pub mod timer;
