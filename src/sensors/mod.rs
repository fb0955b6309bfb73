//! Sensor drivers.  A single analog channel feeds the acquisition loop.

pub mod adc;
