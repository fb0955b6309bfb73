//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger. The logger owns the console on UART0; the command
//! link runs on its own UART, so log lines never reach the host protocol.
//! Routine per-sample chatter is `debug!`; failures are `warn!`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SampleSkipped(e) => {
                debug!("PIPE | sample skipped: {}", e);
            }
            AppEvent::ReadingDerived { reading, voltage } => {
                debug!(
                    "PIPE | raw={} -> {:.3}V -> {}",
                    reading.raw_value, voltage, reading.derived_value
                );
            }
            AppEvent::ReadingStored(reading) => {
                debug!(
                    "PIPE | stored raw={} value={}",
                    reading.raw_value, reading.derived_value
                );
            }
            AppEvent::ButtonChanged { index, pressed } => {
                info!(
                    "BTN | {} {}",
                    index.number(),
                    if *pressed { "pressed" } else { "released" }
                );
            }
            AppEvent::LedApplied { index, on } => {
                info!("LED | {} {}", index.number(), if *on { "on" } else { "off" });
            }
            AppEvent::LedWriteFailed(index) => {
                warn!("LED | {} write failed, retrying next period", index.number());
            }
            AppEvent::CommandExecuted(cmd) => {
                info!("CMD | {:?}", cmd);
            }
            AppEvent::CommandIgnored(byte) => {
                debug!("CMD | ignored byte 0x{:02x}", byte);
            }
            AppEvent::TransmitFailed(e) => {
                warn!("UART | response dropped: {}", e);
            }
            AppEvent::ReceiveRearmed => {
                debug!("UART | receive re-armed");
            }
            AppEvent::RearmFailed(e) => {
                warn!("UART | re-arm failed: {}", e);
            }
        }
    }
}
