//! Outbound application events.
//!
//! Every loop emits these through the [`EventSink`](super::ports::EventSink)
//! port.  The log adapter turns them into serial-console lines; tests record
//! them.

use crate::error::{DriverError, SerialError};
use crate::pipeline::Reading;
use crate::rtdb::IoIndex;

use super::commands::Command;

/// Structured events emitted by the task loops and the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The ADC read failed; this sampling cycle was skipped.
    SampleSkipped(DriverError),

    /// A raw sample was converted.
    ReadingDerived { reading: Reading, voltage: f32 },

    /// A reading was written into the store.
    ReadingStored(Reading),

    /// A button line changed level.
    ButtonChanged { index: IoIndex, pressed: bool },

    /// An LED output was driven to a new state.
    LedApplied { index: IoIndex, on: bool },

    /// An LED output write failed; it will be retried next period.
    LedWriteFailed(IoIndex),

    /// A recognised command byte was executed.
    CommandExecuted(Command),

    /// A byte outside the command table was ignored.
    CommandIgnored(u8),

    /// A response could not be transmitted (not retried).
    TransmitFailed(SerialError),

    /// The receive window was re-armed after being disabled.
    ReceiveRearmed,

    /// Re-arming the receive window failed.
    RearmFailed(SerialError),
}
