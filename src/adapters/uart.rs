//! UART serial adapter.
//!
//! Implements [`SerialPort`] over the raw UART helpers in `hw_init`,
//! emulating a receive-window transceiver:
//!
//! ```text
//!   arm_receive ──▶ Armed ── bytes ──▶ DataReady(..) ── window full ──┐
//!        ▲                                                            │
//!        └──────────────── dispatcher re-arms ◀── RxDisabled ◀────────┘
//! ```
//!
//! A window holds [`RX_BUF_SIZE`] bytes.  Once that many have been
//! delivered the window closes and the next event is `RxDisabled`.  While
//! no window is open (a re-arm failed) `RxDisabled` is reported again
//! after one receive timeout, so the dispatcher keeps retrying.

use core::time::Duration;

use async_io_mini::Timer;
use futures_lite::future::block_on;
use heapless::Vec;

use crate::app::ports::{RX_BUF_SIZE, SerialEvent, SerialPort};
use crate::drivers::hw_init;
use crate::error::SerialError;

pub struct UartAdapter {
    armed: bool,
    disable_pending: bool,
    filled: usize,
    timeout: Duration,
}

impl UartAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            armed: false,
            disable_pending: false,
            filled: 0,
            timeout,
        }
    }

    fn close_window(&mut self) {
        self.armed = false;
        self.disable_pending = true;
    }
}

impl SerialPort for UartAdapter {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        hw_init::uart_write(bytes)
    }

    fn arm_receive(&mut self, timeout: Duration) -> Result<(), SerialError> {
        hw_init::uart_arm_rx()?;
        self.armed = true;
        self.disable_pending = false;
        self.filled = 0;
        self.timeout = timeout;
        Ok(())
    }

    fn next_event(&mut self) -> SerialEvent {
        if !self.armed {
            if !core::mem::take(&mut self.disable_pending) {
                block_on(Timer::after(self.timeout));
            }
            return SerialEvent::RxDisabled;
        }

        let mut buf = [0u8; RX_BUF_SIZE];
        loop {
            let room = RX_BUF_SIZE - self.filled;
            match hw_init::uart_read(&mut buf[..room], self.timeout) {
                Ok(0) => {}
                Ok(n) => {
                    self.filled += n;
                    if self.filled >= RX_BUF_SIZE {
                        self.close_window();
                    }
                    return SerialEvent::DataReady(Vec::from_slice(&buf[..n]).unwrap_or_default());
                }
                Err(e) => {
                    log::warn!("UART | receive error: {}", e);
                    self.close_window();
                    return SerialEvent::RxDisabled;
                }
            }
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::drivers::hw_init::sim;

    const T: Duration = Duration::from_millis(5);

    // Single test: the simulated UART is process-global.
    #[test]
    fn receive_window_lifecycle() {
        let mut uart = UartAdapter::new(T);

        // Not armed yet: reports disabled after one timeout.
        assert_eq!(uart.next_event(), SerialEvent::RxDisabled);

        uart.arm_receive(T).unwrap();
        sim::inject_rx(b"123456789012");
        match uart.next_event() {
            SerialEvent::DataReady(bytes) => assert_eq!(&bytes[..], b"1234567890"),
            other => panic!("unexpected {other:?}"),
        }
        // Window full.
        assert_eq!(uart.next_event(), SerialEvent::RxDisabled);

        uart.arm_receive(T).unwrap();
        match uart.next_event() {
            SerialEvent::DataReady(bytes) => assert_eq!(&bytes[..], b"12"),
            other => panic!("unexpected {other:?}"),
        }

        sim::fail_arm(true);
        assert_eq!(uart.arm_receive(T), Err(SerialError::ArmFailed));
        sim::fail_arm(false);

        uart.transmit(b"Toggle LED 1\r\n").unwrap();
        assert_eq!(sim::take_tx(), b"Toggle LED 1\r\n");
        sim::fail_transmit(true);
        assert_eq!(uart.transmit(b"x"), Err(SerialError::TransmitFailed));
        sim::fail_transmit(false);
    }
}
