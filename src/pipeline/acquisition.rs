//! Periodic sensor acquisition.
//!
//! Best-effort sampling: a failed conversion skips the cycle with no retry
//! and no backoff.  The period is fixed-rate, so the next cycle fires on
//! schedule either way.

use core::time::Duration;

use crate::app::events::AppEvent;
use crate::app::ports::{AdcPort, EventSink};
use crate::scheduler::Periodic;

use super::SampleQueue;

/// One sampling cycle.  Returns `true` when a sample was enqueued.
///
/// Blocks while the sample queue is full.
pub fn step(adc: &mut impl AdcPort, samples: &SampleQueue, sink: &mut impl EventSink) -> bool {
    match adc.read_one() {
        Ok(raw) => {
            samples.put(raw);
            true
        }
        Err(e) => {
            sink.emit(&AppEvent::SampleSkipped(e));
            false
        }
    }
}

/// Acquisition task body.
pub fn run(
    mut adc: impl AdcPort,
    period: Duration,
    samples: &SampleQueue,
    mut sink: impl EventSink,
) -> ! {
    let mut timer = Periodic::new(period);
    loop {
        step(&mut adc, samples, &mut sink);
        timer.wait();
    }
}
