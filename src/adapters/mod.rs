//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to          |
//! |------------|-------------|----------------------|
//! | `log_sink` | EventSink   | Serial log output    |
//! | `uart`     | SerialPort  | ESP32 UART driver    |
//!
//! The ADC port is implemented by `sensors::adc`; button and LED lines are
//! `embedded-hal` pins from `drivers::gpio`.

pub mod log_sink;
pub mod uart;
