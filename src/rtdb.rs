//! Real-time database: the single shared record every task reads or writes.
//!
//! ```text
//!  Persistence ──▶ raw_sample, processed_value ─┐
//!  Button poll ──▶ button_state ────────────────┤   ┌──────────────┐
//!  Dispatcher  ──▶ led_state (toggle) ──────────┼──▶│  RealTimeDb  │
//!  Dispatcher  ◀── any field ───────────────────┤   │  one lock    │
//!  LED sync    ◀── led_state ───────────────────┘   └──────────────┘
//! ```
//!
//! The whole record sits behind one blocking mutex.  Every accessor runs
//! inside a single closure-scoped acquisition, so the lock is released on
//! every exit path and a reader always sees a consistent copy of all four
//! fields.  Accessors only copy or compare; no I/O happens under the lock.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::pipeline::Reading;

/// Number of LEDs and of buttons.
pub const IO_LINES: usize = 4;

/// Index of one LED or button line, guaranteed `< IO_LINES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IoIndex(u8);

impl IoIndex {
    /// Zero-based index, `None` when out of range.
    pub const fn new(index: usize) -> Option<Self> {
        if index < IO_LINES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// All valid indices in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..IO_LINES as u8).map(Self)
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// One-based number as printed in command responses.
    pub const fn number(self) -> u8 {
        self.0 + 1
    }
}

/// Copy of the full record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoData {
    pub led_state: [bool; IO_LINES],
    pub button_state: [bool; IO_LINES],
    pub raw_sample: i16,
    pub processed_value: i32,
}

impl IoData {
    /// All LEDs off, no buttons pressed, sensor values zero.
    pub const ZERO: Self = Self {
        led_state: [false; IO_LINES],
        button_state: [false; IO_LINES],
        raw_sample: 0,
        processed_value: 0,
    };
}

/// The lock-guarded shared record.
pub struct RealTimeDb {
    data: Mutex<CriticalSectionRawMutex, RefCell<IoData>>,
}

impl Default for RealTimeDb {
    fn default() -> Self {
        Self::new()
    }
}

impl RealTimeDb {
    /// A zeroed record; `const` so the process-wide instance can be a static.
    pub const fn new() -> Self {
        Self {
            data: Mutex::new(RefCell::new(IoData::ZERO)),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut IoData) -> R) -> R {
        self.data.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Consistent copy of every field.
    pub fn snapshot(&self) -> IoData {
        self.with(|d| *d)
    }

    // ── LEDs ──────────────────────────────────────────────────

    /// Flip one LED's desired state; returns the new state.
    pub fn toggle_led(&self, index: IoIndex) -> bool {
        self.with(|d| {
            let led = &mut d.led_state[index.get()];
            *led = !*led;
            *led
        })
    }

    pub fn led_state(&self) -> [bool; IO_LINES] {
        self.with(|d| d.led_state)
    }

    // ── Buttons ───────────────────────────────────────────────

    pub fn button_state(&self, index: IoIndex) -> bool {
        self.with(|d| d.button_state[index.get()])
    }

    /// Compare freshly read button levels against the stored ones and write
    /// the lines that differ.  `None` entries (failed reads) are left alone.
    ///
    /// Returns a mask of the lines that changed.
    pub fn merge_buttons(&self, levels: [Option<bool>; IO_LINES]) -> [bool; IO_LINES] {
        self.with(|d| {
            let mut changed = [false; IO_LINES];
            for (i, level) in levels.iter().enumerate() {
                if let Some(level) = *level {
                    if d.button_state[i] != level {
                        d.button_state[i] = level;
                        changed[i] = true;
                    }
                }
            }
            changed
        })
    }

    // ── Sensor ────────────────────────────────────────────────

    /// Overwrite both sensor fields in one acquisition.
    pub fn store_reading(&self, reading: Reading) {
        self.with(|d| {
            d.raw_sample = reading.raw_value;
            d.processed_value = reading.derived_value;
        });
    }

    pub fn raw_sample(&self) -> i16 {
        self.with(|d| d.raw_sample)
    }

    pub fn processed_value(&self) -> i32 {
        self.with(|d| d.processed_value)
    }
}

/// Process-wide instance shared by every task.
pub static RTDB: RealTimeDb = RealTimeDb::new();
