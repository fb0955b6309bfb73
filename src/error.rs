//! Unified error types for the I/O node firmware.
//!
//! A single `Error` enum that every subsystem converts into, so bootstrap
//! code can report failures uniformly.  All variants are `Copy` so they can
//! be handed to the event sink from any loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An ADC or GPIO driver call failed.
    Driver(DriverError),
    /// The serial transceiver rejected a request.
    Serial(SerialError),
    /// Peripheral initialisation or readiness check failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver(e) => write!(f, "driver: {e}"),
            Self::Serial(e) => write!(f, "serial: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Driver errors (ADC / GPIO collaborators)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The device did not report ready at boot.
    NotReady,
    /// Channel setup was rejected by the ADC driver (carries the driver rc).
    AdcSetupFailed(i32),
    /// A conversion was started but did not complete successfully.
    AdcReadFailed(i32),
    /// Pin configuration was rejected by the GPIO driver.
    GpioConfigFailed(i32),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "device not ready"),
            Self::AdcSetupFailed(rc) => write!(f, "ADC channel setup failed (rc={rc})"),
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

// ---------------------------------------------------------------------------
// Serial transceiver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// The driver refused or only partially accepted a transmission.
    TransmitFailed,
    /// The receive window could not be (re-)armed.
    ArmFailed,
    /// The driver has not been installed.
    NotInstalled,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransmitFailed => write!(f, "transmit failed"),
            Self::ArmFailed => write!(f, "receive arm failed"),
            Self::NotInstalled => write!(f, "driver not installed"),
        }
    }
}

impl From<SerialError> for Error {
    fn from(e: SerialError) -> Self {
        Self::Serial(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The build-time JSON override did not parse.
    Malformed,
    /// A field failed range validation; the message names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config override"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
