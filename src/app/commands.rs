//! Single-byte command protocol.
//!
//! | Byte        | Command            | Response line                       |
//! |-------------|--------------------|-------------------------------------|
//! | `'1'..'4'`  | toggle LED n       | `Toggle LED n`                      |
//! | `'5'..'8'`  | read button n      | `Button n state: <0/1>`             |
//! | `'9'`       | read raw sample    | `Raw sensor value: <value>`         |
//! | `'0'`       | read derived value | `Processed sensor value: <value>`   |
//!
//! Any other byte is not a command.

use core::fmt::{self, Write};

use heapless::String;

use crate::rtdb::{IoIndex, RealTimeDb};

/// Longest response line, terminator included.
pub const RESPONSE_CAPACITY: usize = 64;

/// Commands a single received byte can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleLed(IoIndex),
    ReadButton(IoIndex),
    ReadRaw,
    ReadProcessed,
}

impl Command {
    /// Decode one byte; `None` for bytes outside the table.
    pub fn parse(byte: u8) -> Option<Self> {
        match byte {
            b'1'..=b'4' => IoIndex::new(usize::from(byte - b'1')).map(Self::ToggleLed),
            b'5'..=b'8' => IoIndex::new(usize::from(byte - b'5')).map(Self::ReadButton),
            b'9' => Some(Self::ReadRaw),
            b'0' => Some(Self::ReadProcessed),
            _ => None,
        }
    }

    /// Run the command against the store.  Each arm is one lock acquisition.
    pub fn execute(self, db: &RealTimeDb) -> Response {
        match self {
            Self::ToggleLed(index) => {
                db.toggle_led(index);
                Response::LedToggled(index)
            }
            Self::ReadButton(index) => Response::ButtonState {
                index,
                pressed: db.button_state(index),
            },
            Self::ReadRaw => Response::RawValue(db.raw_sample()),
            Self::ReadProcessed => Response::ProcessedValue(db.processed_value()),
        }
    }
}

/// Result of a command, rendered as one protocol line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    LedToggled(IoIndex),
    ButtonState { index: IoIndex, pressed: bool },
    RawValue(i16),
    ProcessedValue(i32),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LedToggled(index) => write!(f, "Toggle LED {}", index.number()),
            Self::ButtonState { index, pressed } => {
                write!(f, "Button {} state: {}", index.number(), u8::from(*pressed))
            }
            Self::RawValue(v) => write!(f, "Raw sensor value: {v}"),
            Self::ProcessedValue(v) => write!(f, "Processed sensor value: {v}"),
        }
    }
}

impl Response {
    /// The CRLF-terminated line sent on the wire.
    pub fn to_line(&self) -> String<RESPONSE_CAPACITY> {
        let mut line = String::new();
        let written = write!(line, "{self}\r\n");
        debug_assert!(written.is_ok());
        line
    }
}
