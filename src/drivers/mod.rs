//! I/O loops, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod gpio;
pub mod hw_init;
pub mod led;
pub mod task_pin;
