//! Reading queue → store.  The only writer of `raw_sample` and
//! `processed_value`.

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::rtdb::RealTimeDb;

use super::ReadingQueue;

/// Store one queued reading.  Blocks until a reading is available.
pub fn step(readings: &ReadingQueue, db: &RealTimeDb, sink: &mut impl EventSink) {
    let reading = readings.get();
    db.store_reading(reading);
    sink.emit(&AppEvent::ReadingStored(reading));
}

/// Persistence task body.
pub fn run(readings: &ReadingQueue, db: &RealTimeDb, mut sink: impl EventSink) -> ! {
    loop {
        step(readings, db, &mut sink);
    }
}
