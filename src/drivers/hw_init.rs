//! One-shot hardware peripheral initialization and raw register access.
//!
//! Configures the ADC channel, button/LED GPIO directions and the command
//! UART using raw ESP-IDF sys calls.  Called once from `main()` before any
//! task is spawned.
//!
//! On the host every entry point is backed by an in-memory simulation
//! (see [`sim`]) so the adapters above this module run unchanged in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use core::time::Duration;

use crate::config::SystemConfig;
use crate::error::{DriverError, Error, SerialError};
#[cfg(target_os = "espidf")]
use crate::{config::Polarity, pins};

#[cfg(target_os = "espidf")]
pub fn init_peripherals(cfg: &SystemConfig) -> Result<(), Error> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_adc()?;
        init_gpio_inputs(cfg.button_polarity)?;
        init_gpio_outputs(cfg.led_polarity)?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(cfg: &SystemConfig) -> Result<(), Error> {
    sim::reset_outputs(cfg.led_polarity);
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

/// Boot-time readiness check for the ADC and UART.
pub fn check_ready() -> Result<(), Error> {
    if !adc_ready() {
        return Err(Error::Init("ADC device not ready"));
    }
    if !uart_ready() {
        return Err(Error::Init("UART device not ready"));
    }
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: `ADC1_HANDLE` is written once in `init_adc()` before any task
/// starts; afterwards it is only read.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), DriverError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(DriverError::AdcSetupFailed(ret)); }

    info!("hw_init: ADC1 unit created");
    Ok(())
}

/// Configure attenuation and bit width for one ADC1 channel.
#[cfg(target_os = "espidf")]
pub fn adc_setup_channel(channel: u32, resolution_bits: u8) -> Result<(), DriverError> {
    if !adc_ready() {
        return Err(DriverError::NotReady);
    }
    // adc_bitwidth_t discriminants equal the bit count.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: u32::from(resolution_bits),
    };
    // SAFETY: the handle is valid after init_adc().
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
    if ret != ESP_OK as i32 { return Err(DriverError::AdcSetupFailed(ret)); }

    info!("hw_init: ADC1 CH{} configured ({} bit)", channel, resolution_bits);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn adc_setup_channel(_channel: u32, _resolution_bits: u8) -> Result<(), DriverError> {
    if !sim::adc_ready() {
        return Err(DriverError::NotReady);
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn adc_ready() -> bool {
    // SAFETY: read-only access to the handle written during init.
    !unsafe { adc1_handle() }.is_null()
}

#[cfg(not(target_os = "espidf"))]
fn adc_ready() -> bool {
    sim::adc_ready()
}

/// Trigger one conversion on `channel` and return the raw code.
#[cfg(target_os = "espidf")]
pub fn adc_read(channel: u32) -> Result<i16, DriverError> {
    if !adc_ready() {
        return Err(DriverError::NotReady);
    }
    let mut raw: i32 = 0;
    // SAFETY: the handle is valid after init; the oneshot driver serialises
    // access internally.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(DriverError::AdcReadFailed(ret));
    }
    i16::try_from(raw).map_err(|_| DriverError::AdcReadFailed(raw))
}

#[cfg(not(target_os = "espidf"))]
pub fn adc_read(_channel: u32) -> Result<i16, DriverError> {
    sim::adc_read()
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs(polarity: Polarity) -> Result<(), DriverError> {
    // Bias the line towards "released".
    let (pull_up_en, pull_down_en) = match polarity {
        Polarity::ActiveLow => (
            gpio_pullup_t_GPIO_PULLUP_ENABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        ),
        Polarity::ActiveHigh => (
            gpio_pullup_t_GPIO_PULLUP_DISABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        ),
    };

    for &pin in &pins::BTN_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en,
            pull_down_en,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(DriverError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: button inputs configured ({:?})", polarity);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: register read on an already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::input_level(pin)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs(polarity: Polarity) -> Result<(), DriverError> {
    let inactive = u32::from(polarity.physical(false));

    for &pin in &pins::LED_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(DriverError::GpioConfigFailed(ret)); }
        let ret = unsafe { gpio_set_level(pin, inactive) };
        if ret != ESP_OK as i32 { return Err(DriverError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: LED outputs configured, all off");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), DriverError> {
    // SAFETY: register write on an output pin configured during init.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(DriverError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), DriverError> {
    sim::set_output(pin, high);
    Ok(())
}

// ── UART ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), SerialError> {
    let cfg = uart_config_t {
        baud_rate: pins::UART_BAUD,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let ret = unsafe {
        uart_driver_install(
            pins::UART_PORT,
            pins::UART_RX_RING,
            pins::UART_TX_RING,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 { return Err(SerialError::NotInstalled); }

    let ret = unsafe { uart_param_config(pins::UART_PORT, &cfg) };
    if ret != ESP_OK as i32 { return Err(SerialError::NotInstalled); }

    let ret = unsafe {
        uart_set_pin(
            pins::UART_PORT,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK as i32 { return Err(SerialError::NotInstalled); }

    info!("hw_init: UART{} @ {} baud", pins::UART_PORT, pins::UART_BAUD);
    Ok(())
}

#[cfg(target_os = "espidf")]
fn uart_ready() -> bool {
    // SAFETY: pure driver-state query.
    unsafe { uart_is_driver_installed(pins::UART_PORT) }
}

#[cfg(not(target_os = "espidf"))]
fn uart_ready() -> bool {
    true
}

#[cfg(target_os = "espidf")]
fn ms_to_ticks(timeout: Duration) -> TickType_t {
    let ms = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    ms.saturating_mul(configTICK_RATE_HZ) / 1000
}

/// Queue `bytes` for transmission; blocks on driver flow control.
#[cfg(target_os = "espidf")]
pub fn uart_write(bytes: &[u8]) -> Result<(), SerialError> {
    // SAFETY: the driver copies `bytes` into its TX ring before returning.
    let n = unsafe {
        uart_write_bytes(pins::UART_PORT, bytes.as_ptr().cast(), bytes.len())
    };
    if usize::try_from(n).ok() != Some(bytes.len()) {
        return Err(SerialError::TransmitFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(bytes: &[u8]) -> Result<(), SerialError> {
    sim::uart_write(bytes)
}

/// Read up to `buf.len()` bytes, waiting at most `timeout` for the first.
/// `Ok(0)` means the timeout elapsed with nothing received.
#[cfg(target_os = "espidf")]
pub fn uart_read(buf: &mut [u8], timeout: Duration) -> Result<usize, SerialError> {
    let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
    // SAFETY: `buf` is valid for `len` bytes for the duration of the call.
    let n = unsafe {
        uart_read_bytes(pins::UART_PORT, buf.as_mut_ptr().cast(), len, ms_to_ticks(timeout))
    };
    usize::try_from(n).map_err(|_| SerialError::NotInstalled)
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read(buf: &mut [u8], timeout: Duration) -> Result<usize, SerialError> {
    Ok(sim::uart_read(buf, timeout))
}

/// Check the driver can accept a new receive window.
#[cfg(target_os = "espidf")]
pub fn uart_arm_rx() -> Result<(), SerialError> {
    if !uart_ready() {
        return Err(SerialError::ArmFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_arm_rx() -> Result<(), SerialError> {
    sim::uart_arm()
}

// ── Host simulation ───────────────────────────────────────────

/// In-memory stand-ins for the peripherals, used on non-ESP targets.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::config::Polarity;
    use crate::error::{DriverError, SerialError};

    static ADC_VALUE: AtomicI32 = AtomicI32::new(512);
    static ADC_FAIL: AtomicBool = AtomicBool::new(false);
    static ADC_READY: AtomicBool = AtomicBool::new(true);

    /// Bit n = level of GPIO n.  Inputs idle high (pull-up).
    static INPUT_LEVELS: AtomicU64 = AtomicU64::new(u64::MAX);
    static OUTPUT_LEVELS: AtomicU64 = AtomicU64::new(0);

    static UART_RX: Mutex<VecDeque<u8>> = Mutex::new(VecDeque::new());
    static UART_TX: Mutex<Vec<u8>> = Mutex::new(Vec::new());
    static UART_FAIL_TX: AtomicBool = AtomicBool::new(false);
    static UART_FAIL_ARM: AtomicBool = AtomicBool::new(false);

    pub fn set_adc(raw: i32) {
        ADC_VALUE.store(raw, Ordering::Relaxed);
    }

    pub fn fail_adc(fail: bool) {
        ADC_FAIL.store(fail, Ordering::Relaxed);
    }

    pub fn set_adc_ready(ready: bool) {
        ADC_READY.store(ready, Ordering::Relaxed);
    }

    pub(super) fn adc_ready() -> bool {
        ADC_READY.load(Ordering::Relaxed)
    }

    pub(super) fn adc_read() -> Result<i16, DriverError> {
        if !adc_ready() {
            return Err(DriverError::NotReady);
        }
        if ADC_FAIL.load(Ordering::Relaxed) {
            return Err(DriverError::AdcReadFailed(-1));
        }
        let raw = ADC_VALUE.load(Ordering::Relaxed);
        i16::try_from(raw).map_err(|_| DriverError::AdcReadFailed(raw))
    }

    pub fn set_input(pin: i32, high: bool) {
        let bit = 1u64 << pin;
        if high {
            INPUT_LEVELS.fetch_or(bit, Ordering::Relaxed);
        } else {
            INPUT_LEVELS.fetch_and(!bit, Ordering::Relaxed);
        }
    }

    pub(super) fn input_level(pin: i32) -> bool {
        INPUT_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
    }

    pub(super) fn set_output(pin: i32, high: bool) {
        let bit = 1u64 << pin;
        if high {
            OUTPUT_LEVELS.fetch_or(bit, Ordering::Relaxed);
        } else {
            OUTPUT_LEVELS.fetch_and(!bit, Ordering::Relaxed);
        }
    }

    pub fn output_level(pin: i32) -> bool {
        OUTPUT_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
    }

    pub(super) fn reset_outputs(polarity: Polarity) {
        let idle = if polarity.physical(false) { u64::MAX } else { 0 };
        OUTPUT_LEVELS.store(idle, Ordering::Relaxed);
    }

    /// Queue bytes as if they had arrived on the wire.
    pub fn inject_rx(bytes: &[u8]) {
        if let Ok(mut rx) = UART_RX.lock() {
            rx.extend(bytes.iter().copied());
        }
    }

    /// Drain everything transmitted so far.
    pub fn take_tx() -> Vec<u8> {
        UART_TX
            .lock()
            .map(|mut tx| core::mem::take(&mut *tx))
            .unwrap_or_default()
    }

    pub fn fail_transmit(fail: bool) {
        UART_FAIL_TX.store(fail, Ordering::Relaxed);
    }

    pub fn fail_arm(fail: bool) {
        UART_FAIL_ARM.store(fail, Ordering::Relaxed);
    }

    pub(super) fn uart_write(bytes: &[u8]) -> Result<(), SerialError> {
        if UART_FAIL_TX.load(Ordering::Relaxed) {
            return Err(SerialError::TransmitFailed);
        }
        let mut tx = UART_TX.lock().map_err(|_| SerialError::TransmitFailed)?;
        tx.extend_from_slice(bytes);
        Ok(())
    }

    pub(super) fn uart_arm() -> Result<(), SerialError> {
        if UART_FAIL_ARM.load(Ordering::Relaxed) {
            return Err(SerialError::ArmFailed);
        }
        Ok(())
    }

    pub(super) fn uart_read(buf: &mut [u8], timeout: Duration) -> usize {
        let n = drain_into(buf);
        if n == 0 {
            std::thread::sleep(timeout);
            return drain_into(buf);
        }
        n
    }

    fn drain_into(buf: &mut [u8]) -> usize {
        let Ok(mut rx) = UART_RX.lock() else {
            return 0;
        };
        let n = buf.len().min(rx.len());
        for (slot, byte) in buf.iter_mut().zip(rx.drain(..n)) {
            *slot = byte;
        }
        n
    }
}
