use core::cell::RefCell;

use atomic::{Atomic, Ordering};
use critical_section::{CriticalSection, Mutex};

use crate::config::Address;
use crate::i2c::I2c;
use crate::message::{Mailbox, Message, MessageQueue, MSGLEN};
use crate::registers::SspRegisters;
use crate::state_holder::StateDump;
use crate::{Error, State};

/// Static home for an [`I2c`] driver and the queues it talks to.
///
/// `to_main` carries everything the driver reports. `samples` is read by the
/// slave command dispatcher and is typically fed by the UART receive handler.
pub struct Bridge<R: SspRegisters, const CHSIZE: usize, const TXBUFSIZE: usize, const RXBUFSIZE: usize> {
    to_main: MessageQueue<CHSIZE>,
    samples: MessageQueue<CHSIZE>,
    driver: Mutex<RefCell<Option<I2c<R, TXBUFSIZE, RXBUFSIZE>>>>,
    state: Atomic<State>,
}

impl<R: SspRegisters, const CHSIZE: usize, const TXBUFSIZE: usize, const RXBUFSIZE: usize>
    Bridge<R, CHSIZE, TXBUFSIZE, RXBUFSIZE>
{
    pub const fn new() -> Self {
        Self {
            to_main: MessageQueue::new(),
            samples: MessageQueue::new(),
            driver: Mutex::new(RefCell::new(None)),
            state: Atomic::new(State::Idle),
        }
    }

    /// Hands a configured driver to the bridge. Must happen before the
    /// peripheral interrupt is enabled.
    pub fn install(&self, driver: I2c<R, TXBUFSIZE, RXBUFSIZE>) {
        critical_section::with(|cs| {
            self.state.store(driver.state(), Ordering::SeqCst);
            *self.driver.borrow_ref_mut(cs) = Some(driver);
        });
    }

    fn with_driver<T>(
        &self,
        cs: CriticalSection,
        f: impl FnOnce(&mut I2c<R, TXBUFSIZE, RXBUFSIZE>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut slot = self.driver.borrow_ref_mut(cs);
        let driver = slot.as_mut().ok_or(Error::Uninitialized)?;
        let res = f(&mut *driver);
        self.state.store(driver.state(), Ordering::SeqCst);
        res
    }

    pub fn begin_write(&self, payload: &[u8], address: Address) -> Result<(), Error> {
        critical_section::with(|cs| self.with_driver(cs, |d| d.begin_write(payload, address)))
    }

    pub fn begin_write_read(
        &self,
        payload: &[u8],
        address: Address,
        receive_length: usize,
    ) -> Result<(), Error> {
        critical_section::with(|cs| {
            self.with_driver(cs, |d| d.begin_write_read(payload, address, receive_length))
        })
    }

    pub fn begin_read(&self, length: usize) -> Result<(), Error> {
        critical_section::with(|cs| self.with_driver(cs, |d| d.begin_read(length)))
    }

    pub fn begin_reply(&self, payload: &[u8]) -> Result<(), Error> {
        critical_section::with(|cs| self.with_driver(cs, |d| d.begin_reply(payload)))
    }

    /// Protocol state as of the last interrupt or API call. Lock free.
    pub fn state(&self) -> State {
        self.state.load(Ordering::SeqCst)
    }

    pub fn samples(&self) -> &MessageQueue<CHSIZE> {
        &self.samples
    }

    pub async fn receive(&self) -> Message {
        self.to_main.receive().await
    }

    pub fn try_receive(&self) -> Option<Message> {
        Mailbox::try_receive(&self.to_main, MSGLEN)
    }

    pub fn dump_state(&self) -> Option<StateDump> {
        critical_section::with(|cs| self.with_driver(cs, |d| Ok(d.comm().dump())).ok())
    }

    pub(crate) fn on_interrupt(&self, cs: CriticalSection) {
        let res = self.with_driver(cs, |d| {
            d.on_interrupt(&self.to_main, &self.samples);
            Ok(())
        });

        if res.is_err() {
            warn!("i2c interrupt before a driver was installed");
        }
    }
}

impl<R: SspRegisters, const CHSIZE: usize, const TXBUFSIZE: usize, const RXBUFSIZE: usize> Default
    for Bridge<R, CHSIZE, TXBUFSIZE, RXBUFSIZE>
{
    fn default() -> Self {
        Self::new()
    }
}
