use fugit::HertzU32;

use crate::Error;

/// 7-bit I2C address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Construct an address type. 10-bit addresses are not supported.
    pub const fn new(addr: u8) -> Option<Self> {
        match addr {
            0x00..=0x7F => Some(Self(addr)),
            _ => None,
        }
    }

    /// interpret address as a read command
    pub fn read(&self) -> u8 {
        (self.0 << 1) | 1
    }

    /// interpret address as a write command
    pub fn write(&self) -> u8 {
        self.0 << 1
    }
}

impl From<Address> for u8 {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Address {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(Error::InvalidAddress)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frequency {
    /// 100 kHz
    Standard,
    /// 400 kHz
    Fast,
}

impl Frequency {
    pub fn hertz(self) -> HertzU32 {
        match self {
            Frequency::Standard => HertzU32::kHz(100),
            Frequency::Fast => HertzU32::kHz(400),
        }
    }

    /// Baud rate divisor for a master clocked from `clock`:
    /// `clock / (4 * bus) - 1`.
    pub fn divisor(self, clock: HertzU32) -> Result<u8, Error> {
        let ratio = clock.raw() / (4 * self.hertz().raw());
        match ratio.checked_sub(1) {
            Some(div @ 3..=255) => Ok(div as u8),
            _ => Err(Error::InvalidFrequency),
        }
    }
}

/// Bus role, fixed for the lifetime of the driver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Role {
    Master {
        /// Peripheral input clock.
        clock: HertzU32,
        frequency: Frequency,
    },
    Slave {
        address: Address,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    pub role: Role,
    /// Slave errors are reported once this many have accumulated.
    pub error_threshold: u8,
    /// Give up a master write after this many NACK retries. `None` retries forever.
    pub max_write_retries: Option<u8>,
}

impl Config {
    pub const DEFAULT_ERROR_THRESHOLD: u8 = 5;

    pub fn master(clock: HertzU32, frequency: Frequency) -> Self {
        Self {
            role: Role::Master { clock, frequency },
            error_threshold: Self::DEFAULT_ERROR_THRESHOLD,
            max_write_retries: None,
        }
    }

    pub fn slave(address: Address) -> Self {
        Self {
            role: Role::Slave { address },
            error_threshold: Self::DEFAULT_ERROR_THRESHOLD,
            max_write_retries: None,
        }
    }
}
