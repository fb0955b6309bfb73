//! `embedded-hal` digital pins over the raw GPIO helpers in `hw_init`.
//!
//! The button and LED loops are generic over `InputPin` / `OutputPin`;
//! these are the concrete pins handed to them at boot.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::hw_init;
use crate::error::DriverError;

impl embedded_hal::digital::Error for DriverError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// A configured GPIO input line.
#[derive(Debug, Clone, Copy)]
pub struct GpioInput {
    pin: i32,
}

impl GpioInput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioInput {
    type Error = core::convert::Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.pin))
    }
}

/// A configured GPIO push-pull output line.
#[derive(Debug, Clone, Copy)]
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioOutput {
    type Error = DriverError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true)
    }
}
