use crate::receive_buffer::ReceiveBuffer;
use crate::send_buffer::SendBuffer;
use crate::state_holder::{StateDump, StateHolder};
use crate::{ErrorCode, State};

/// The communication record shared by both engines.
///
/// Owned by the driver and only ever borrowed mutably from interrupt context
/// (or from the main task inside a critical section).
pub struct I2cComm<const TXBUFSIZE: usize, const RXBUFSIZE: usize> {
    pub(crate) state: StateHolder,
    /// 8-bit wire address: the peer (master role) or this device (slave role).
    pub(crate) slave_address: u8,
    pub(crate) receive_buffer: ReceiveBuffer<RXBUFSIZE>,
    pub(crate) send_buffer: SendBuffer<TXBUFSIZE>,
    pub(crate) event_count: u8,
    pub(crate) error_count: u8,
    pub(crate) last_error: Option<ErrorCode>,
}

impl<const TXBUFSIZE: usize, const RXBUFSIZE: usize> I2cComm<TXBUFSIZE, RXBUFSIZE> {
    pub const fn new() -> Self {
        Self {
            state: StateHolder::new(),
            slave_address: 0,
            receive_buffer: ReceiveBuffer::new(),
            send_buffer: SendBuffer::new(),
            event_count: 0,
            error_count: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> State {
        self.state.get_state()
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state.set_state(state)
    }

    pub fn slave_address(&self) -> u8 {
        self.slave_address
    }

    pub fn event_count(&self) -> u8 {
        self.event_count
    }

    pub fn error_count(&self) -> u8 {
        self.error_count
    }

    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    pub fn received(&self) -> &[u8] {
        self.receive_buffer.filled()
    }

    pub(crate) fn record_error(&mut self, code: ErrorCode) {
        warn!("i2c error {} in {}", code, self.state());
        self.error_count = self.error_count.saturating_add(1);
        self.last_error = Some(code);
    }

    pub(crate) fn count_event(&mut self) {
        self.event_count = self.event_count.wrapping_add(1);
    }

    /// Diagnostic record `[error count, last error code, event count]`.
    pub(crate) fn take_diagnostic(&mut self) -> [u8; 3] {
        let record = [
            self.error_count,
            self.last_error.map_or(0, |code| code as u8),
            self.event_count,
        ];
        self.error_count = 0;
        record
    }

    pub fn dump(&self) -> StateDump {
        StateDump {
            current_state: self.state(),
            state_history: self.state.history(),
            event_count: self.event_count,
            error_count: self.error_count,
        }
    }
}

impl<const TXBUFSIZE: usize, const RXBUFSIZE: usize> Default for I2cComm<TXBUFSIZE, RXBUFSIZE> {
    fn default() -> Self {
        Self::new()
    }
}
