use clap::{crate_version, Clap};
use slog::{o, Drain};
use std::process::exit;
use std::thread;
use std::time::Duration;

use workpool::{format_duration, Config, IdleMode, Pool, Result, Task, TaskMeta, Timer};

#[derive(Clap)]
#[clap(version = crate_version!())]
struct Options {
    /// Number of tasks to enqueue.
    #[clap(long, short, default_value = "100")]
    tasks: usize,

    /// Number of workers, defaults to one less than the number of cores.
    #[clap(long, short)]
    workers: Option<usize>,

    /// Worker behavior on an empty request queue: wait or exit.
    #[clap(long, default_value = "exit")]
    idle: IdleMode,

    /// Base sleep in milliseconds; each task sleeps base * (worker id + 1).
    #[clap(long, default_value = "40")]
    sleep: u64,

    /// Emit pool lifecycle trace output.
    #[clap(long, short)]
    verbose: bool,
}

/// The demonstration task: its only effect is to sleep for a duration
/// proportional to the id of the worker that picked it up.
struct SleepTask {
    meta: TaskMeta,
    base: Duration,
}

impl SleepTask {
    fn new(base: Duration) -> SleepTask {
        SleepTask {
            meta: TaskMeta::new(),
            base,
        }
    }
}

impl Task for SleepTask {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TaskMeta {
        &mut self.meta
    }

    fn perform(&mut self) -> Result<()> {
        // the executing worker is stamped before perform runs
        let slot = self.meta.executing_worker().unwrap_or(0);
        thread::sleep(self.base * (slot as u32 + 1));
        Ok(())
    }
}

fn main() {
    let options = Options::parse();

    let mut config = Config::default();
    config.idle = options.idle;
    if let Some(workers) = options.workers {
        config.workers = workers;
    }
    if options.verbose {
        config.logger = Some(logger());
    }

    let mut pool = Pool::with_config(config);
    println!("Enqueueing {} tasks for {} workers.", options.tasks, pool.num_workers());

    for _ in 0..options.tasks {
        pool.insert(SleepTask::new(Duration::from_millis(options.sleep)));
    }

    let mut timer = Timer::new();
    timer.start();

    if let Err(e) = pool.spawn() {
        eprintln!("{}", e);
        exit(1);
    }

    if options.idle == IdleMode::Wait {
        // waiting workers never exit on their own, drain then shut down
        while pool.num_workers() > 0 && pool.pending() > 0 {
            thread::sleep(Duration::from_millis(10));
        }
        pool.force_exit();
    }
    pool.wait();

    println!("Elapsed time {}.", format_duration(timer.elapsed()));
    println!("CPU time {}.", format_duration(timer.cpu_time()));

    println!("Processing results computed by workers.");
    pool.process(|task| match task.executing_worker() {
        Some(worker) => println!("Task {} performed by worker {}", task.id(), worker),
        None => println!("Task {} was never performed", task.id()),
    });
}

fn logger() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, o!())
}
