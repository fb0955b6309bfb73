//! Mock ports for integration tests.
//!
//! Records every serial transmission and every emitted event so tests can
//! assert on the full history without touching real peripherals.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iomod::app::events::AppEvent;
use iomod::app::ports::{AdcPort, EventSink, RX_BUF_SIZE, SerialEvent, SerialPort};
use iomod::error::{DriverError, SerialError};

// ── Serial ────────────────────────────────────────────────────

/// Scripted transceiver: events are queued by the test, transmissions are
/// recorded as strings.
#[derive(Default)]
pub struct MockSerial {
    pub sent: Vec<String>,
    pub arm_calls: usize,
    pub events: VecDeque<SerialEvent>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue received bytes, split into windows like the real transceiver.
    pub fn receive(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(RX_BUF_SIZE) {
            let window = heapless::Vec::from_slice(chunk).unwrap();
            self.events.push_back(SerialEvent::DataReady(window));
        }
    }

    /// Take the lines sent so far.
    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

impl SerialPort for MockSerial {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.sent.push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    fn arm_receive(&mut self, _timeout: Duration) -> Result<(), SerialError> {
        self.arm_calls += 1;
        Ok(())
    }

    fn next_event(&mut self) -> SerialEvent {
        self.events.pop_front().unwrap_or(SerialEvent::RxDisabled)
    }
}

// ── ADC ───────────────────────────────────────────────────────

/// ADC returning scripted results, then `NotReady` forever.
pub struct MockAdc {
    script: VecDeque<Result<i16, DriverError>>,
}

impl MockAdc {
    pub fn new(script: impl IntoIterator<Item = Result<i16, DriverError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl AdcPort for MockAdc {
    fn setup(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn read_one(&mut self) -> Result<i16, DriverError> {
        self.script.pop_front().unwrap_or(Err(DriverError::NotReady))
    }
}

// ── Event sink ────────────────────────────────────────────────

/// Sink whose history is shared with the test thread.
#[derive(Clone, Default)]
pub struct SharedRecorder(pub Arc<Mutex<Vec<AppEvent>>>);

#[allow(dead_code)]
impl SharedRecorder {
    pub fn events(&self) -> Vec<AppEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSink for SharedRecorder {
    fn emit(&mut self, event: &AppEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}
