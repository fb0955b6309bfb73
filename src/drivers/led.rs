//! LED sync loop: store → four output lines, on change.
//!
//! Keeps a private shadow of what the outputs currently show.  The shadow
//! starts all-off, matching the lines configured inactive at boot, and is
//! only updated after a successful pin write so a failed write is retried
//! on the next period.

use core::time::Duration;

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::Polarity;
use crate::rtdb::{IO_LINES, IoIndex, RealTimeDb};
use crate::scheduler::run_periodic;

pub struct LedSync<P> {
    lines: [P; IO_LINES],
    polarity: Polarity,
    shadow: [bool; IO_LINES],
}

impl<P: OutputPin> LedSync<P> {
    pub fn new(lines: [P; IO_LINES], polarity: Polarity) -> Self {
        Self {
            lines,
            polarity,
            shadow: [false; IO_LINES],
        }
    }

    /// What the outputs are believed to show.
    pub fn shadow(&self) -> [bool; IO_LINES] {
        self.shadow
    }

    /// One sync cycle.  Returns how many lines were driven successfully.
    pub fn sync(&mut self, db: &RealTimeDb, sink: &mut impl EventSink) -> usize {
        let desired = db.led_state();
        let mut applied = 0;

        for index in IoIndex::all() {
            let i = index.get();
            let on = desired[i];
            if on == self.shadow[i] {
                continue;
            }
            let level = PinState::from(self.polarity.physical(on));
            match self.lines[i].set_state(level) {
                Ok(()) => {
                    self.shadow[i] = on;
                    applied += 1;
                    sink.emit(&AppEvent::LedApplied { index, on });
                }
                Err(_) => sink.emit(&AppEvent::LedWriteFailed(index)),
            }
        }
        applied
    }

    /// LED sync task body.
    pub fn run(mut self, period: Duration, db: &RealTimeDb, mut sink: impl EventSink) -> ! {
        run_periodic(period, || {
            self.sync(db, &mut sink);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::rc::Rc;

    #[derive(Debug)]
    struct WriteError;

    impl embedded_hal::digital::Error for WriteError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Records every level written; can be told to fail.
    #[derive(Clone, Default)]
    struct FakeLed {
        writes: Rc<RefCell<Vec<bool>>>,
        fail: Rc<Cell<bool>>,
    }

    impl ErrorType for FakeLed {
        type Error = WriteError;
    }

    impl OutputPin for FakeLed {
        fn set_low(&mut self) -> Result<(), WriteError> {
            self.set_state(PinState::Low)
        }
        fn set_high(&mut self) -> Result<(), WriteError> {
            self.set_state(PinState::High)
        }
        fn set_state(&mut self, state: PinState) -> Result<(), WriteError> {
            if self.fail.get() {
                return Err(WriteError);
            }
            self.writes.borrow_mut().push(state == PinState::High);
            Ok(())
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    fn idx(i: usize) -> IoIndex {
        IoIndex::new(i).unwrap()
    }

    #[test]
    fn only_changed_lines_are_driven() {
        let leds: [FakeLed; IO_LINES] = Default::default();
        let seen = leds.clone();
        let mut sync = LedSync::new(leds, Polarity::ActiveHigh);
        let db = RealTimeDb::new();

        // Store matches the boot state: nothing to do.
        assert_eq!(sync.sync(&db, &mut NullSink), 0);

        db.toggle_led(idx(1));
        assert_eq!(sync.sync(&db, &mut NullSink), 1);
        assert_eq!(sync.sync(&db, &mut NullSink), 0);
        assert_eq!(*seen[1].writes.borrow(), [true]);
        assert!(seen[0].writes.borrow().is_empty());

        db.toggle_led(idx(1));
        sync.sync(&db, &mut NullSink);
        assert_eq!(*seen[1].writes.borrow(), [true, false]);
    }

    #[test]
    fn active_low_inverts_the_level() {
        let leds: [FakeLed; IO_LINES] = Default::default();
        let seen = leds.clone();
        let mut sync = LedSync::new(leds, Polarity::ActiveLow);
        let db = RealTimeDb::new();

        db.toggle_led(idx(3));
        sync.sync(&db, &mut NullSink);
        assert_eq!(*seen[3].writes.borrow(), [false]);
    }

    #[test]
    fn failed_write_is_retried_next_period() {
        let leds: [FakeLed; IO_LINES] = Default::default();
        let seen = leds.clone();
        let mut sync = LedSync::new(leds, Polarity::ActiveHigh);
        let db = RealTimeDb::new();

        db.toggle_led(idx(0));
        seen[0].fail.set(true);
        assert_eq!(sync.sync(&db, &mut NullSink), 0);
        assert_eq!(sync.shadow(), [false; 4]);

        seen[0].fail.set(false);
        assert_eq!(sync.sync(&db, &mut NullSink), 1);
        assert_eq!(sync.shadow(), [true, false, false, false]);
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn running_loop_drives_gpio_outputs() {
        use crate::drivers::gpio::GpioOutput;
        use crate::drivers::hw_init::sim;
        use std::time::Instant;

        static DB: RealTimeDb = RealTimeDb::new();
        let lines = [50, 51, 52, 53].map(GpioOutput::new);
        let sync = LedSync::new(lines, Polarity::ActiveHigh);
        std::thread::spawn(move || {
            sync.run(Duration::from_millis(5), &DB, NullSink);
        });

        DB.toggle_led(idx(2));
        let give_up = Instant::now() + Duration::from_secs(2);
        while !sim::output_level(52) {
            assert!(Instant::now() < give_up, "LED 2 never turned on");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!sim::output_level(50));

        DB.toggle_led(idx(2));
        while sim::output_level(52) {
            assert!(Instant::now() < give_up, "LED 2 never turned off");
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
