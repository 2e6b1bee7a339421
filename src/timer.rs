use std::time::{Duration, Instant};

/// Wall-clock and process CPU time measured from the last `start`. CPU time
/// is summed over all threads, so a busy pool reports more CPU time than
/// elapsed time. Reading the timer never touches pool state.
pub struct Timer {
    started: Instant,
    cpu_started: Duration,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            started: Instant::now(),
            cpu_started: process_cpu_time(),
        }
    }

    /// Restart both clocks.
    pub fn start(&mut self) {
        self.started = Instant::now();
        self.cpu_started = process_cpu_time();
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn cpu_time(&self) -> Duration {
        process_cpu_time()
            .checked_sub(self.cpu_started)
            .unwrap_or_else(|| Duration::from_secs(0))
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

#[cfg(unix)]
fn process_cpu_time() -> Duration {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // CLOCK_PROCESS_CPUTIME_ID sums CPU time over every thread
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if rc == 0 {
        Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
    } else {
        Duration::from_secs(0)
    }
}

#[cfg(not(unix))]
fn process_cpu_time() -> Duration {
    Duration::from_secs(0)
}

/// Human-readable rendering of a duration, in seconds below a minute and
/// hr/min/sec above it.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        return format!("{:.3} sec", secs);
    }

    let whole = duration.as_secs();
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let seconds = secs - (whole / 60 * 60) as f64;
    if hours > 0 {
        format!("{} hr {} min {:.1} sec", hours, minutes, seconds)
    } else {
        format!("{} min {:.1} sec", minutes, seconds)
    }
}
