//! Application core: command protocol, dispatcher, and the port traits.
//!
//! Everything here is hardware-agnostic.  The dispatcher reaches the
//! serial transceiver only through [`ports::SerialPort`] and the shared
//! state only through [`RealTimeDb`](crate::rtdb::RealTimeDb).

pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod ports;
