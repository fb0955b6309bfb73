//! I/O node firmware main entry point.
//!
//! Bootstraps the peripherals, opens the command link and spawns the six
//! long-running tasks.  After that the main thread has nothing left to do.
//!
//! ```text
//! ┌──────────────────────── APP core ─────────────────────────┐
//! │ acq (7) ─▶ SAMPLE_QUEUE ─▶ xform (6) ─▶ READING_QUEUE ─▶  │
//! │                                          persist (5) ─▶ RTDB
//! │ btn (7) ─▶ RTDB          RTDB ─▶ led (7)                   │
//! └───────────────────────────────────────────────────────────┘
//! ┌──────────────────────── PRO core ─────────────────────────┐
//! │ uart (5): UART events ⇄ CommandDispatcher ⇄ RTDB          │
//! └───────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

#[cfg(target_os = "espidf")]
mod esp_link_shims;

use anyhow::Result;
use log::{error, info};

use iomod::adapters::log_sink::LogEventSink;
use iomod::adapters::uart::UartAdapter;
use iomod::app::dispatcher::CommandDispatcher;
use iomod::app::ports::AdcPort;
use iomod::config::SystemConfig;
use iomod::drivers::button::ButtonPoller;
use iomod::drivers::gpio::{GpioInput, GpioOutput};
use iomod::drivers::hw_init;
use iomod::drivers::led::LedSync;
use iomod::drivers::task_pin::{Core, spawn_on_core};
use iomod::pins;
use iomod::pipeline::transform::Transformer;
use iomod::pipeline::{READING_QUEUE, SAMPLE_QUEUE, acquisition, persistence, transform};
use iomod::rtdb::RTDB;
use iomod::sensors::adc::AdcSensor;

/// Log the reason and terminate with a failure status.  Used only before
/// any task has been spawned.
fn fatal(what: &str, e: impl core::fmt::Display) -> ! {
    error!("{}: {}, halting", what, e);
    std::process::exit(1);
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  iomod v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::load();
    if let Err(e) = config.validate() {
        fatal("Config invalid", e);
    }

    // ── 3. Peripherals + readiness ────────────────────────────
    if let Err(e) = hw_init::init_peripherals(&config).and_then(|()| hw_init::check_ready()) {
        fatal("HAL init failed", e);
    }

    let mut adc = AdcSensor::new(pins::SENSOR_ADC_CHANNEL, config.conversion.resolution_bits);
    if let Err(e) = adc.setup() {
        fatal("ADC channel setup failed", e);
    }

    // ── 4. Banner + first receive window ──────────────────────
    let mut uart = UartAdapter::new(config.rx_timeout());
    let mut dispatcher = CommandDispatcher::new(&RTDB, config.rx_timeout());
    if let Err(e) = dispatcher.start(&mut uart, &config.banner) {
        fatal("Serial start failed", e);
    }

    // ── 5. Tasks ──────────────────────────────────────────────
    let tasks = config.tasks;
    let sample_period = config.sample_period();
    let transformer = Transformer::new(&config.conversion);

    spawn_on_core(Core::App, tasks.acquisition, "acq\0", move || {
        acquisition::run(adc, sample_period, &SAMPLE_QUEUE, LogEventSink)
    })?;

    spawn_on_core(Core::App, tasks.transform, "xform\0", move || {
        transform::run(transformer, &SAMPLE_QUEUE, &READING_QUEUE, LogEventSink)
    })?;

    spawn_on_core(Core::App, tasks.persistence, "persist\0", || {
        persistence::run(&READING_QUEUE, &RTDB, LogEventSink)
    })?;

    let buttons = ButtonPoller::new(pins::BTN_GPIOS.map(GpioInput::new), config.button_polarity);
    let button_period = config.button_poll_period();
    spawn_on_core(Core::App, tasks.button_poll, "btn\0", move || {
        buttons.run(button_period, &RTDB, LogEventSink)
    })?;

    let leds = LedSync::new(pins::LED_GPIOS.map(GpioOutput::new), config.led_polarity);
    let led_period = config.led_sync_period();
    spawn_on_core(Core::App, tasks.led_sync, "led\0", move || {
        leds.run(led_period, &RTDB, LogEventSink)
    })?;

    spawn_on_core(Core::Pro, tasks.serial, "uart\0", move || {
        dispatcher.run(uart, LogEventSink)
    })?;

    info!("System ready.");

    loop {
        std::thread::park();
    }
}
