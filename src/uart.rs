//! Interrupt-driven UART byte stream.
//!
//! Received bytes are framed into fixed-size sensor samples and posted to a
//! [`Mailbox`]. Transmission drains a staged buffer one byte per interrupt.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use heapless::Vec;

use crate::message::{Mailbox, MessageTag};
use crate::send_buffer::SendBuffer;
use crate::Error;

/// Bytes in one sensor sample frame.
pub const UART_FRAME_LEN: usize = 5;

pub trait UartRegisters {
    fn data_ready(&self) -> bool;

    fn read(&mut self) -> u8;

    fn overrun(&self) -> bool;

    /// Cycles the receiver enable to clear an overrun.
    fn reset_receiver(&mut self);

    fn transmit_idle(&self) -> bool;

    fn write(&mut self, byte: u8);

    fn set_transmit_interrupt(&mut self, enabled: bool);
}

pub struct Uart<U: UartRegisters, const TXBUFSIZE: usize> {
    regs: U,
    frame: Vec<u8, UART_FRAME_LEN>,
    send_buffer: SendBuffer<TXBUFSIZE>,
}

impl<U: UartRegisters, const TXBUFSIZE: usize> Uart<U, TXBUFSIZE> {
    pub const fn new(regs: U) -> Self {
        Self {
            regs,
            frame: Vec::new(),
            send_buffer: SendBuffer::new(),
        }
    }

    pub fn regs(&self) -> &U {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut U {
        &mut self.regs
    }

    pub fn pending(&self) -> &[u8] {
        &self.frame
    }

    pub fn on_receive<M: Mailbox>(&mut self, out: &M) {
        if self.regs.data_ready() {
            let byte = self.regs.read();
            // The frame is flushed as soon as it fills, so there is room.
            let _ = self.frame.push(byte);

            if self.frame.is_full() {
                out.post(MessageTag::UartData, &self.frame);
                self.frame.clear();
            }
        }

        if self.regs.overrun() {
            warn!("uart: receive overrun");
            self.regs.reset_receiver();
            out.post(MessageTag::UartOverrun, &[]);
        }
    }

    /// Stages `data` and enables the transmit interrupt.
    pub fn transmit(&mut self, data: &[u8]) -> Result<(), Error> {
        if !self.send_buffer.is_empty() {
            return Err(Error::Busy);
        }

        self.send_buffer
            .write(data)
            .map_err(|_| Error::PayloadTooLong)?;
        self.regs.set_transmit_interrupt(true);
        Ok(())
    }

    pub fn on_transmit(&mut self) {
        if !self.regs.transmit_idle() {
            return;
        }

        match self.send_buffer.next() {
            Some(byte) => self.regs.write(byte),
            None => {
                self.send_buffer.reset();
                self.regs.set_transmit_interrupt(false);
            }
        }
    }
}

/// Static home for a [`Uart`], shared between its interrupt handlers and the
/// main task.
pub struct UartBridge<U: UartRegisters, const TXBUFSIZE: usize> {
    driver: Mutex<RefCell<Option<Uart<U, TXBUFSIZE>>>>,
}

impl<U: UartRegisters, const TXBUFSIZE: usize> UartBridge<U, TXBUFSIZE> {
    pub const fn new() -> Self {
        Self {
            driver: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn install(&self, uart: Uart<U, TXBUFSIZE>) {
        critical_section::with(|cs| {
            *self.driver.borrow_ref_mut(cs) = Some(uart);
        });
    }

    pub fn transmit(&self, data: &[u8]) -> Result<(), Error> {
        critical_section::with(|cs| {
            self.driver
                .borrow_ref_mut(cs)
                .as_mut()
                .ok_or(Error::Uninitialized)?
                .transmit(data)
        })
    }

    pub(crate) fn on_receive<M: Mailbox>(&self, cs: CriticalSection, out: &M) {
        if let Some(uart) = self.driver.borrow_ref_mut(cs).as_mut() {
            uart.on_receive(out);
        }
    }

    pub(crate) fn on_transmit(&self, cs: CriticalSection) {
        if let Some(uart) = self.driver.borrow_ref_mut(cs).as_mut() {
            uart.on_transmit();
        }
    }
}

impl<U: UartRegisters, const TXBUFSIZE: usize> Default for UartBridge<U, TXBUFSIZE> {
    fn default() -> Self {
        Self::new()
    }
}
