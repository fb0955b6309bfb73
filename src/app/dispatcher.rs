//! Command dispatcher: reacts to serial receive events.
//!
//! ```text
//!                 DataReady(bytes) ─┐
//!                                   ▼
//!   start() ──▶ ┌───────┐       (execute each byte, respond)
//!               │ Armed │◀──────────┘
//!               └───┬───┘
//!      RxDisabled   │        ▲ re-arm ok
//!                   ▼        │
//!               ┌──────────┐ │
//!               │ Disabled │─┘   re-arm failed: stay, retried on the
//!               └──────────┘     transceiver's next RxDisabled
//! ```
//!
//! The dispatcher is reactive only: it never sleeps or polls on its own.

use core::time::Duration;

use log::info;

use crate::error::SerialError;
use crate::rtdb::RealTimeDb;

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{EventSink, SerialEvent, SerialPort};

/// Receive-window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// A receive window is open.
    Armed,
    /// The window closed and must be re-armed.
    Disabled,
}

/// Serial command handler bound to the shared store.
pub struct CommandDispatcher<'db> {
    db: &'db RealTimeDb,
    rx_timeout: Duration,
    state: RxState,
}

impl<'db> CommandDispatcher<'db> {
    /// A dispatcher that has not armed its receive window yet.
    pub fn new(db: &'db RealTimeDb, rx_timeout: Duration) -> Self {
        Self {
            db,
            rx_timeout,
            state: RxState::Disabled,
        }
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    /// Boot sequence: send the banner, then open the first receive window.
    ///
    /// Either failure is fatal for the caller.
    pub fn start(&mut self, serial: &mut impl SerialPort, banner: &str) -> Result<(), SerialError> {
        serial.transmit(banner.as_bytes())?;
        serial.arm_receive(self.rx_timeout)?;
        self.state = RxState::Armed;
        info!("Dispatcher: receive armed (timeout {:?})", self.rx_timeout);
        Ok(())
    }

    /// Handle one transceiver notification.
    pub fn handle_event(
        &mut self,
        event: SerialEvent,
        serial: &mut impl SerialPort,
        sink: &mut impl EventSink,
    ) {
        match event {
            SerialEvent::DataReady(bytes) => {
                for &byte in &bytes {
                    self.handle_byte(byte, serial, sink);
                }
            }
            SerialEvent::RxDisabled => {
                self.state = RxState::Disabled;
                match serial.arm_receive(self.rx_timeout) {
                    Ok(()) => {
                        self.state = RxState::Armed;
                        sink.emit(&AppEvent::ReceiveRearmed);
                    }
                    Err(e) => sink.emit(&AppEvent::RearmFailed(e)),
                }
            }
        }
    }

    /// Execute one byte as a command and transmit the response line.
    fn handle_byte(&self, byte: u8, serial: &mut impl SerialPort, sink: &mut impl EventSink) {
        let Some(cmd) = Command::parse(byte) else {
            sink.emit(&AppEvent::CommandIgnored(byte));
            return;
        };

        // The store lock is released before transmitting.
        let response = cmd.execute(self.db);
        sink.emit(&AppEvent::CommandExecuted(cmd));

        let line = response.to_line();
        if let Err(e) = serial.transmit(line.as_bytes()) {
            sink.emit(&AppEvent::TransmitFailed(e));
        }
    }

    /// Serve events forever.
    pub fn run(mut self, mut serial: impl SerialPort, mut sink: impl EventSink) -> ! {
        loop {
            let event = serial.next_event();
            self.handle_event(event, &mut serial, &mut sink);
        }
    }
}
