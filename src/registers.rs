//! Hardware boundary of the synchronous serial port.
//!
//! The engines never touch memory-mapped registers directly. A board crate
//! implements [`SspRegisters`] on top of its PAC and hands it to [`crate::I2c`].

/// Acknowledge value sent by the master after a received byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    Ack,
    Nack,
}

/// Snapshot of the peripheral status flags taken at the top of an interrupt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SspStatus {
    pub buffer_full: bool,
    /// Start or repeated start.
    pub start: bool,
    pub stop: bool,
    /// The last byte was data, `false` for an address.
    pub data: bool,
    pub read: bool,
    pub overrun: bool,
    pub nack: bool,
}

pub trait SspRegisters {
    /// Master mode with the given baud rate divisor.
    fn configure_master(&mut self, divisor: u8);

    /// 7-bit slave mode with start/stop interrupts and clock stretching.
    /// `address` is the 8-bit wire form (address << 1).
    fn configure_slave(&mut self, address: u8);

    fn status(&self) -> SspStatus;

    fn clear_overrun(&mut self);

    fn read_buffer(&mut self) -> u8;

    fn write_buffer(&mut self, byte: u8);

    fn start(&mut self);

    fn repeated_start(&mut self);

    fn stop(&mut self);

    fn enable_receive(&mut self);

    fn acknowledge(&mut self, ack: Ack);

    fn release_clock(&mut self);
}
