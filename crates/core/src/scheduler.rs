//! Fixed-interval pass scheduling.
//!
//! [`run_scheduled`] drives a unit of work on an absolute timetable: the
//! first pass starts immediately and pass `i` starts at `start + i *
//! interval`. A pass that overruns its slot delays the next pass but never
//! shifts the timetable, so later passes are not pushed back.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

// ---------------------------------------------------------------------------
// Clock abstraction
// ---------------------------------------------------------------------------

/// Time source for the scheduler. Tests substitute a manual clock so
/// schedules can be verified without real waiting.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep_until(&self, deadline: Instant);
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&self, deadline: Instant) {
        let wait = deadline.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduled run
// ---------------------------------------------------------------------------

/// Run `work` exactly `runs` times, one pass per interval slot.
///
/// `work` receives the zero-based pass index. The first error stops the
/// run and is returned; with `runs == 0` the work is never called.
///
/// Deadlines are computed as `start + pass * interval`, so the caller
/// keeps `interval * (runs - 1)` within the clock's range;
/// `MirrorConfig::validate` enforces that bound for the binary.
pub fn run_scheduled<C, F, E>(
    clock: &C,
    runs: u32,
    interval: Duration,
    mut work: F,
) -> Result<(), E>
where
    C: Clock,
    F: FnMut(u32) -> Result<(), E>,
{
    let start = clock.now();
    for pass in 0..runs {
        clock.sleep_until(start + interval * pass);
        debug!(pass = pass + 1, runs, "pass due");
        work(pass)?;
    }
    Ok(())
}
