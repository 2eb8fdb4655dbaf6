#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

mod bridge;
mod comm;
mod config;
mod dispatch;
mod i2c;
pub mod interrupts;
mod master;
mod message;
mod receive_buffer;
mod registers;
mod send_buffer;
mod slave;
mod state_holder;
pub mod uart;

pub use bridge::Bridge;
pub use comm::I2cComm;
pub use config::{Address, Config, Frequency, Role};
pub use dispatch::{GATHER_CHECK, GATHER_REQUEST, MOVEMENT_COMMAND};
pub use i2c::I2c;
pub use message::{Mailbox, Message, MessageQueue, MessageTag, MSGLEN};
pub use registers::{Ack, SspRegisters, SspStatus};
pub use state_holder::{StateDump, STATES_HISTORY_SIZE};
pub use uart::{Uart, UartBridge, UartRegisters, UART_FRAME_LEN};

/// Protocol state of the shared communication record.
///
/// `Idle` is the only state both roles share as "no transaction". Every other
/// state belongs to exactly one role, except `RcvData` which is used by both
/// (a master reading, a slave being written to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    Idle,
    WriteAddr,
    WriteData,
    RcvData,
    Ack,
    RepStart,
    EndWrite,
    Started,
    SlaveSend,
}

impl State {
    pub fn is_idle(self) -> bool {
        matches!(self, State::Idle)
    }
}

/// Cause of a protocol error, carried as the second byte of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// A data byte arrived where only an address was valid.
    NoAddress = 0x01,
    /// A stop or restart arrived where a data byte was required.
    NoData = 0x02,
    Overrun = 0x03,
    MessageTooLong = 0x04,
    BusNack = 0x05,
    UnknownCommand = 0x06,
}

/// Errors returned synchronously by the driver API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A transaction is already in progress.
    Busy,
    /// Address does not fit in 7 bits.
    InvalidAddress,
    /// Payload does not fit in the transmit buffer.
    PayloadTooLong,
    /// Requested read length does not fit in the receive buffer.
    ReadTooLong,
    /// Operation is not available in the configured role.
    WrongRole,
    /// A reply was staged while the slave was not addressed for reading.
    NotSending,
    /// The bus frequency cannot be derived from the peripheral clock.
    InvalidFrequency,
    /// No driver has been installed in the bridge.
    Uninitialized,
}
