//! Analog sensor on one ADC1 channel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the channel via the oneshot API (unit created by
//! `hw_init`, channel configured by [`AdcSensor::setup`]).
//! On host/test: reads the value injected through `hw_init::sim`.

use crate::app::ports::AdcPort;
use crate::drivers::hw_init;
use crate::error::DriverError;

pub struct AdcSensor {
    channel: u32,
    resolution_bits: u8,
    configured: bool,
}

impl AdcSensor {
    pub fn new(channel: u32, resolution_bits: u8) -> Self {
        Self {
            channel,
            resolution_bits,
            configured: false,
        }
    }
}

impl AdcPort for AdcSensor {
    fn setup(&mut self) -> Result<(), DriverError> {
        hw_init::adc_setup_channel(self.channel, self.resolution_bits)?;
        self.configured = true;
        Ok(())
    }

    fn read_one(&mut self) -> Result<i16, DriverError> {
        if !self.configured {
            return Err(DriverError::NotReady);
        }
        hw_init::adc_read(self.channel)
    }
}
