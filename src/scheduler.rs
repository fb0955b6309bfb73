//! Fixed-rate periodic scheduling for task loops.
//!
//! Deadlines advance by exactly one period from the previous deadline, so
//! work time inside a cycle does not stretch the period.  When a cycle
//! overruns past its next deadline the missed ticks are skipped: the
//! schedule re-anchors on `now` instead of firing a burst to catch up.
//!
//! ```text
//!   prev            prev+P          prev+2P
//!    │── work ──┐     │                │
//!    │          wait ─┤── work ──┐     │
//!    ▼                ▼          wait ─┤
//! ```

use std::time::{Duration, Instant};

use async_io_mini::Timer;
use futures_lite::future::block_on;

/// Deadline following `prev` for a fixed-rate loop.
///
/// `prev + period` when that still lies in the future, otherwise
/// `now + period` (missed ticks are dropped).
pub fn next_deadline(prev: Instant, period: Duration, now: Instant) -> Instant {
    let next = prev + period;
    if next <= now { now + period } else { next }
}

/// Drift-free periodic timer.
pub struct Periodic {
    period: Duration,
    next: Instant,
}

impl Periodic {
    /// First deadline is one period from now.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline the next `wait` sleeps until.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Block the calling thread until the current deadline, then arm the
    /// next one.
    pub fn wait(&mut self) {
        let deadline = self.next;
        if deadline > Instant::now() {
            block_on(Timer::at(deadline));
        }
        self.next = next_deadline(deadline, self.period, Instant::now());
    }
}

/// Run `f` forever at a fixed rate.  `f` runs immediately, then once per
/// period.
pub fn run_periodic(period: Duration, mut f: impl FnMut()) -> ! {
    let mut timer = Periodic::new(period);
    loop {
        f();
        timer.wait();
    }
}
