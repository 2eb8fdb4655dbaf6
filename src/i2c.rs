use crate::comm::I2cComm;
use crate::config::{Address, Config, Role};
use crate::master::MasterEngine;
use crate::message::Mailbox;
use crate::registers::SspRegisters;
use crate::slave::SlaveEngine;
use crate::{Error, State};

enum Engine {
    Master(MasterEngine),
    Slave(SlaveEngine),
}

/// I2C driver for one synchronous serial port, fixed to a single role.
pub struct I2c<R: SspRegisters, const TXBUFSIZE: usize, const RXBUFSIZE: usize> {
    regs: R,
    comm: I2cComm<TXBUFSIZE, RXBUFSIZE>,
    engine: Engine,
}

impl<R: SspRegisters, const TXBUFSIZE: usize, const RXBUFSIZE: usize> I2c<R, TXBUFSIZE, RXBUFSIZE> {
    /// Configures the peripheral for `config.role` and returns an idle driver.
    pub fn new(mut regs: R, config: Config) -> Result<Self, Error> {
        let mut comm = I2cComm::new();

        let engine = match config.role {
            Role::Master { clock, frequency } => {
                let divisor = frequency.divisor(clock)?;
                regs.configure_master(divisor);
                info!("i2c: master, divisor {}", divisor);
                Engine::Master(MasterEngine::new(config.max_write_retries))
            }
            Role::Slave { address } => {
                comm.slave_address = address.write();
                regs.configure_slave(comm.slave_address);
                info!("i2c: slave at {}", address);
                Engine::Slave(SlaveEngine::new(config.error_threshold))
            }
        };

        Ok(Self { regs, comm, engine })
    }

    pub fn is_master(&self) -> bool {
        matches!(self.engine, Engine::Master(_))
    }

    pub fn state(&self) -> State {
        self.comm.state()
    }

    pub fn comm(&self) -> &I2cComm<TXBUFSIZE, RXBUFSIZE> {
        &self.comm
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Write-only master transaction. Completion is reported on the channel.
    pub fn begin_write(&mut self, payload: &[u8], address: Address) -> Result<(), Error> {
        self.begin_write_read(payload, address, 0)
    }

    /// Master write followed by a read of `receive_length` bytes from the same
    /// address.
    pub fn begin_write_read(
        &mut self,
        payload: &[u8],
        address: Address,
        receive_length: usize,
    ) -> Result<(), Error> {
        match &mut self.engine {
            Engine::Master(master) => master.begin_write(
                &mut self.comm,
                &mut self.regs,
                payload,
                address,
                receive_length,
            ),
            Engine::Slave(_) => Err(Error::WrongRole),
        }
    }

    /// Master read from the address of the previous write.
    ///
    /// The previous transaction ended with a stop, so this issues a fresh
    /// start. Use [`Self::begin_write_read`] to read behind a repeated start.
    pub fn begin_read(&mut self, length: usize) -> Result<(), Error> {
        match &mut self.engine {
            Engine::Master(master) => master.begin_read(&mut self.comm, &mut self.regs, length),
            Engine::Slave(_) => Err(Error::WrongRole),
        }
    }

    /// Slave reply to a read that is holding the clock.
    pub fn begin_reply(&mut self, payload: &[u8]) -> Result<(), Error> {
        match self.engine {
            Engine::Slave(_) => SlaveEngine::begin_reply(&mut self.comm, &mut self.regs, payload),
            Engine::Master(_) => Err(Error::WrongRole),
        }
    }

    /// Services one peripheral interrupt. `samples` feeds slave replies and
    /// is never touched in master mode.
    pub fn on_interrupt<M: Mailbox, S: Mailbox>(&mut self, out: &M, samples: &S) {
        match &mut self.engine {
            Engine::Master(master) => master.on_event(&mut self.comm, &mut self.regs, out),
            Engine::Slave(slave) => {
                slave.on_event(&mut self.comm, &mut self.regs, out, samples)
            }
        }
    }
}
