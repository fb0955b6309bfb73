//! Port traits: the boundary between the task loops and the drivers.
//!
//! ```text
//!   Driver adapter ──▶ Port trait ──▶ task loop / dispatcher
//! ```
//!
//! The ADC and serial transceiver are reached through the traits below;
//! button and LED lines use the `embedded-hal` digital traits directly.
//! Every loop is generic over its ports, so the whole core runs on the
//! host against mocks.

use core::time::Duration;

use heapless::Vec;

use crate::error::{DriverError, SerialError};

// ───────────────────────────────────────────────────────────────
// ADC port (driven adapter: hardware → acquisition loop)
// ───────────────────────────────────────────────────────────────

/// Single-channel analog sampler.
pub trait AdcPort {
    /// Configure the channel (gain, reference, acquisition time).
    fn setup(&mut self) -> Result<(), DriverError>;

    /// Trigger one conversion and return the raw code.
    fn read_one(&mut self) -> Result<i16, DriverError>;
}

// ───────────────────────────────────────────────────────────────
// Serial port (driving adapter: transceiver ⇄ dispatcher)
// ───────────────────────────────────────────────────────────────

/// Size of one receive window buffer.
pub const RX_BUF_SIZE: usize = 10;

/// Notification raised by the serial transceiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialEvent {
    /// Bytes arrived in the armed receive window.
    DataReady(Vec<u8, RX_BUF_SIZE>),
    /// The receive window closed; it must be re-armed to get more data.
    RxDisabled,
}

/// Byte-oriented transceiver with an explicit receive window.
pub trait SerialPort {
    /// Send `bytes`, blocking until the driver accepts them.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), SerialError>;

    /// Open a fresh receive window with the given inactivity timeout.
    fn arm_receive(&mut self, timeout: Duration) -> Result<(), SerialError>;

    /// Block until the transceiver has something to report.
    fn next_event(&mut self) -> SerialEvent;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// Loops report what they did through this port.  Emitting must never
/// block on I/O the loop depends on.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
