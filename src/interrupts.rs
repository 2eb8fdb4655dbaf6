//! Entry points for the board's interrupt vectors.
//!
//! ```ignore
//! static I2C: Bridge<Ssp1, 8, 16, 16> = Bridge::new();
//!
//! #[interrupt]
//! fn SSP1() {
//!     mssp_i2c::interrupts::handle_i2c_interrupt(&I2C);
//! }
//! ```
//!
//! Each handler runs to completion inside a critical section. The peripheral
//! interrupt must not be re-armed until the handler returns.

use crate::bridge::Bridge;
use crate::message::Mailbox;
use crate::registers::SspRegisters;
use crate::uart::{UartBridge, UartRegisters};

pub fn handle_i2c_interrupt<
    R: SspRegisters,
    const CHSIZE: usize,
    const TXBUFSIZE: usize,
    const RXBUFSIZE: usize,
>(
    bridge: &Bridge<R, CHSIZE, TXBUFSIZE, RXBUFSIZE>,
) {
    critical_section::with(|cs| bridge.on_interrupt(cs));
}

/// `out` receives completed sample frames; usually the I2C bridge's
/// [`Bridge::samples`] queue.
pub fn handle_uart_receive_interrupt<U: UartRegisters, M: Mailbox, const TXBUFSIZE: usize>(
    uart: &UartBridge<U, TXBUFSIZE>,
    out: &M,
) {
    critical_section::with(|cs| uart.on_receive(cs, out));
}

pub fn handle_uart_transmit_interrupt<U: UartRegisters, const TXBUFSIZE: usize>(
    uart: &UartBridge<U, TXBUFSIZE>,
) {
    critical_section::with(|cs| uart.on_transmit(cs));
}
