//! GPIO / peripheral pin assignments for the I/O node board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Indicator LEDs (push-pull outputs)
// ---------------------------------------------------------------------------

pub const LED0_GPIO: i32 = 2;
pub const LED1_GPIO: i32 = 4;
pub const LED2_GPIO: i32 = 12;
pub const LED3_GPIO: i32 = 13;

/// LED output lines, indexed like `IoData::led_state`.
pub const LED_GPIOS: [i32; 4] = [LED0_GPIO, LED1_GPIO, LED2_GPIO, LED3_GPIO];

// ---------------------------------------------------------------------------
// Push-buttons (inputs with internal pull-up)
// ---------------------------------------------------------------------------

pub const BTN0_GPIO: i32 = 14;
pub const BTN1_GPIO: i32 = 15;
pub const BTN2_GPIO: i32 = 16;
pub const BTN3_GPIO: i32 = 17;

/// Button input lines, indexed like `IoData::button_state`.
pub const BTN_GPIOS: [i32; 4] = [BTN0_GPIO, BTN1_GPIO, BTN2_GPIO, BTN3_GPIO];

// ---------------------------------------------------------------------------
// Analog sensor (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 1 carries the analog sensor (single-ended).
pub const SENSOR_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// UARTs
// ---------------------------------------------------------------------------

/// UART0 stays with the ESP-IDF console (log output).
pub const CONSOLE_UART_PORT: i32 = 0;
pub const CONSOLE_TX_GPIO: i32 = 1;
pub const CONSOLE_RX_GPIO: i32 = 3;

/// The command link owns UART1 on its own pins.
pub const UART_PORT: i32 = 1;
pub const UART_TX_GPIO: i32 = 25;
pub const UART_RX_GPIO: i32 = 26;
pub const UART_BAUD: i32 = 115_200;
/// Driver-side ring buffer sizes (bytes).
pub const UART_RX_RING: i32 = 256;
pub const UART_TX_RING: i32 = 256;
