//! Button poll loop: four input lines → store, on change.
//!
//! ## Hardware
//!
//! Momentary switches, one per line.  With the default active-low wiring
//! the internal pull-up holds a released line high and a press pulls it
//! to ground; [`Polarity`] maps the physical level to "pressed".
//!
//! The lines are read outside the store lock, then merged in a single lock
//! acquisition so the dispatcher never sees a half-updated button set.  A
//! line whose read fails keeps its previously stored value.

use core::time::Duration;

use embedded_hal::digital::InputPin;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::Polarity;
use crate::rtdb::{IO_LINES, IoIndex, RealTimeDb};
use crate::scheduler::run_periodic;

pub struct ButtonPoller<P> {
    lines: [P; IO_LINES],
    polarity: Polarity,
}

impl<P: InputPin> ButtonPoller<P> {
    pub fn new(lines: [P; IO_LINES], polarity: Polarity) -> Self {
        Self { lines, polarity }
    }

    /// Logical state of every line; `None` where the read failed.
    fn read_lines(&mut self) -> [Option<bool>; IO_LINES] {
        let polarity = self.polarity;
        let mut levels = [None; IO_LINES];
        for (level, line) in levels.iter_mut().zip(self.lines.iter_mut()) {
            *level = line.is_high().ok().map(|high| polarity.logical(high));
        }
        levels
    }

    /// One poll cycle.  Returns the mask of lines that changed.
    pub fn poll(&mut self, db: &RealTimeDb, sink: &mut impl EventSink) -> [bool; IO_LINES] {
        let levels = self.read_lines();
        let changed = db.merge_buttons(levels);

        for index in IoIndex::all().filter(|i| changed[i.get()]) {
            if let Some(pressed) = levels[index.get()] {
                sink.emit(&AppEvent::ButtonChanged { index, pressed });
            }
        }
        changed
    }

    /// Button poll task body.
    pub fn run(mut self, period: Duration, db: &RealTimeDb, mut sink: impl EventSink) -> ! {
        run_periodic(period, || {
            self.poll(db, &mut sink);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::rc::Rc;

    #[derive(Debug)]
    struct ReadError;

    impl embedded_hal::digital::Error for ReadError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Shared-level fake; `None` makes the read fail.
    #[derive(Clone)]
    struct FakeLine(Rc<Cell<Option<bool>>>);

    impl FakeLine {
        fn new(high: bool) -> Self {
            Self(Rc::new(Cell::new(Some(high))))
        }
    }

    impl ErrorType for FakeLine {
        type Error = ReadError;
    }

    impl InputPin for FakeLine {
        fn is_high(&mut self) -> Result<bool, ReadError> {
            self.0.get().ok_or(ReadError)
        }
        fn is_low(&mut self) -> Result<bool, ReadError> {
            self.is_high().map(|h| !h)
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<AppEvent>);
    impl EventSink for Recorder {
        fn emit(&mut self, event: &AppEvent) {
            self.0.push(event.clone());
        }
    }

    fn idx(i: usize) -> IoIndex {
        IoIndex::new(i).unwrap()
    }

    fn released_lines() -> [FakeLine; IO_LINES] {
        core::array::from_fn(|_| FakeLine::new(true))
    }

    #[test]
    fn press_and_release_are_detected_once() {
        let lines = released_lines();
        let btn2 = lines[2].clone();
        let mut poller = ButtonPoller::new(lines, Polarity::ActiveLow);
        let db = RealTimeDb::new();
        let mut sink = Recorder::default();

        assert_eq!(poller.poll(&db, &mut sink), [false; 4]);

        btn2.0.set(Some(false));
        assert_eq!(poller.poll(&db, &mut sink), [false, false, true, false]);
        assert!(db.button_state(idx(2)));
        // Holding produces no further change.
        assert_eq!(poller.poll(&db, &mut sink), [false; 4]);

        btn2.0.set(Some(true));
        poller.poll(&db, &mut sink);
        assert!(!db.button_state(idx(2)));

        assert_eq!(
            sink.0,
            [
                AppEvent::ButtonChanged { index: idx(2), pressed: true },
                AppEvent::ButtonChanged { index: idx(2), pressed: false },
            ]
        );
    }

    #[test]
    fn failed_read_keeps_stored_value() {
        let lines = released_lines();
        let btn0 = lines[0].clone();
        let mut poller = ButtonPoller::new(lines, Polarity::ActiveLow);
        let db = RealTimeDb::new();
        let mut sink = Recorder::default();

        btn0.0.set(Some(false));
        poller.poll(&db, &mut sink);
        assert!(db.button_state(idx(0)));

        btn0.0.set(None);
        assert_eq!(poller.poll(&db, &mut sink), [false; 4]);
        assert!(db.button_state(idx(0)));
    }

    #[test]
    fn active_high_wiring() {
        let lines: [FakeLine; IO_LINES] = core::array::from_fn(|_| FakeLine::new(false));
        let btn3 = lines[3].clone();
        let mut poller = ButtonPoller::new(lines, Polarity::ActiveHigh);
        let db = RealTimeDb::new();

        poller.poll(&db, &mut Recorder::default());
        assert_eq!(db.snapshot().button_state, [false; 4]);

        btn3.0.set(Some(true));
        poller.poll(&db, &mut Recorder::default());
        assert_eq!(db.snapshot().button_state, [false, false, false, true]);
    }
}
