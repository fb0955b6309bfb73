//! System configuration parameters
//!
//! All tunable parameters for the I/O node. Nothing is persisted; a build
//! can override the defaults by setting `IOMOD_CONFIG` to a JSON document
//! at compile time (see [`SystemConfig::load`]).

use core::time::Duration;

use heapless::String;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum length of the startup banner.
pub const BANNER_CAPACITY: usize = 64;

/// Banner transmitted once at boot, before command processing begins.
pub const DEFAULT_BANNER: &str = "xxxxxxxxxxxxxx Welcome xxxxxxxxxxxxxx\n\r";

/// Pin polarity: which physical level means "on" / "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Logical state for a physical "is high" reading.
    pub fn logical(self, is_high: bool) -> bool {
        match self {
            Self::ActiveHigh => is_high,
            Self::ActiveLow => !is_high,
        }
    }

    /// Physical "drive high" for a logical state.
    pub fn physical(self, on: bool) -> bool {
        self.logical(on)
    }
}

/// ADC and raw → engineering-unit conversion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// ADC resolution in bits (full scale = 2^bits − 1).
    pub resolution_bits: u8,
    /// Voltage represented by a full-scale reading.
    pub reference_v: f32,
    /// Gain `k` in `derived = k * (voltage − offset)`.
    pub scale_k: f32,
    /// Offset in volts.
    pub offset_v: f32,
}

impl ConversionConfig {
    /// Largest raw code the ADC can report at this resolution.
    pub fn full_scale(&self) -> f32 {
        2f32.powi(i32::from(self.resolution_bits)) - 1.0
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            resolution_bits: 10,
            reference_v: 3.0,
            scale_k: 60.0,
            offset_v: 1.0,
        }
    }
}

/// Priority and stack for one spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// FreeRTOS priority (larger = more urgent).
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskConfig {
    const fn new(priority: u8, stack_kb: usize) -> Self {
        Self { priority, stack_kb }
    }
}

/// Three static priority tiers.
pub const PRIORITY_HIGH: u8 = 7;
pub const PRIORITY_MID: u8 = 6;
pub const PRIORITY_LOW: u8 = 5;

/// Per-task scheduling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTable {
    pub acquisition: TaskConfig,
    pub transform: TaskConfig,
    pub persistence: TaskConfig,
    pub button_poll: TaskConfig,
    pub led_sync: TaskConfig,
    pub serial: TaskConfig,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self {
            acquisition: TaskConfig::new(PRIORITY_HIGH, 4),
            transform: TaskConfig::new(PRIORITY_MID, 4),
            persistence: TaskConfig::new(PRIORITY_LOW, 4),
            button_poll: TaskConfig::new(PRIORITY_HIGH, 4),
            led_sync: TaskConfig::new(PRIORITY_HIGH, 4),
            serial: TaskConfig::new(PRIORITY_LOW, 6),
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Sensor acquisition period (milliseconds)
    pub sample_period_ms: u32,
    /// Button poll period (milliseconds)
    pub button_poll_period_ms: u32,
    /// LED sync period (milliseconds)
    pub led_sync_period_ms: u32,
    /// Serial receive inactivity timeout (milliseconds)
    pub rx_timeout_ms: u32,

    // --- Sensor ---
    pub conversion: ConversionConfig,

    // --- GPIO ---
    pub button_polarity: Polarity,
    pub led_polarity: Polarity,

    // --- Serial ---
    pub banner: String<BANNER_CAPACITY>,

    // --- Tasks ---
    pub tasks: TaskTable,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut banner = String::new();
        let pushed = banner.push_str(DEFAULT_BANNER);
        debug_assert!(pushed.is_ok());

        Self {
            // Timing
            sample_period_ms: 1000,     // 1 Hz
            button_poll_period_ms: 100, // 10 Hz
            led_sync_period_ms: 100,    // 10 Hz
            rx_timeout_ms: 100,

            conversion: ConversionConfig::default(),

            // Buttons pull up to VDD and short to ground when pressed.
            button_polarity: Polarity::ActiveLow,
            led_polarity: Polarity::ActiveLow,

            banner,
            tasks: TaskTable::default(),
        }
    }
}

impl SystemConfig {
    /// Resolve the running configuration.
    ///
    /// Uses the compile-time `IOMOD_CONFIG` JSON override when present and
    /// valid; otherwise the defaults.
    pub fn load() -> Self {
        match option_env!("IOMOD_CONFIG") {
            Some(json) => match Self::from_json(json) {
                Ok(cfg) => {
                    info!("Config: build-time override applied");
                    cfg
                }
                Err(e) => {
                    warn!("Config: override rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.sample_period_ms))
    }

    pub fn button_poll_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.button_poll_period_ms))
    }

    pub fn led_sync_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.led_sync_period_ms))
    }

    pub fn rx_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.rx_timeout_ms))
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the loops cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("sample_period_ms must be > 0"));
        }
        if self.button_poll_period_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "button_poll_period_ms must be > 0",
            ));
        }
        if self.led_sync_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("led_sync_period_ms must be > 0"));
        }
        if self.rx_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("rx_timeout_ms must be > 0"));
        }

        let c = &self.conversion;
        if !(1..=16).contains(&c.resolution_bits) {
            return Err(ConfigError::ValidationFailed(
                "conversion.resolution_bits must be 1..=16",
            ));
        }
        if !c.reference_v.is_finite() || c.reference_v <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "conversion.reference_v must be finite and > 0",
            ));
        }
        if !c.scale_k.is_finite() || !c.offset_v.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "conversion constants must be finite",
            ));
        }

        if !self.banner.ends_with('\n') && !self.banner.ends_with('\r') {
            return Err(ConfigError::ValidationFailed(
                "banner must end with a line terminator",
            ));
        }
        Ok(())
    }
}
