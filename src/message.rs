use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use heapless::Vec;

/// Longest payload a single message can carry.
pub const MSGLEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageTag {
    MasterSendComplete,
    MasterSendFailed,
    MasterRecvComplete,
    MasterRecvFailed,
    /// Slave write completed; payload is the data plus the event count.
    I2cData,
    /// Aggregated slave errors: error count, last error code, event count.
    I2cDebug,
    GatherRequest,
    MovementCommand,
    /// One full sensor sample frame from the UART.
    UartData,
    UartOverrun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    pub tag: MessageTag,
    pub payload: Vec<u8, MSGLEN>,
}

impl Message {
    pub fn new(tag: MessageTag, payload: &[u8]) -> Option<Self> {
        Some(Self {
            tag,
            payload: Vec::from_slice(payload).ok()?,
        })
    }
}

pub type MessageQueue<const N: usize> = Channel<CriticalSectionRawMutex, Message, N>;

/// Bounded message transport between interrupt handlers and the main task.
pub trait Mailbox {
    /// Fire-and-forget. A message that does not fit is dropped.
    fn post(&self, tag: MessageTag, payload: &[u8]);

    /// Never blocks. A pending message longer than `max_len` is consumed and
    /// discarded.
    fn try_receive(&self, max_len: usize) -> Option<Message>;
}

impl<M: RawMutex, const N: usize> Mailbox for Channel<M, Message, N> {
    fn post(&self, tag: MessageTag, payload: &[u8]) {
        let Some(message) = Message::new(tag, payload) else {
            warn!("dropping {}: {} byte payload", tag, payload.len());
            return;
        };

        if self.try_send(message).is_err() {
            warn!("dropping {}: channel is full", tag);
        }
    }

    fn try_receive(&self, max_len: usize) -> Option<Message> {
        let message = Channel::try_receive(self).ok()?;

        if message.payload.len() > max_len {
            warn!(
                "discarding {}: {} bytes, expected at most {}",
                message.tag,
                message.payload.len(),
                max_len
            );
            return None;
        }

        Some(message)
    }
}
