//! Interrupt-driven slave state machine.
//!
//! The peripheral stretches the clock after every address and data byte. The
//! handler releases it once the byte is consumed, except when the master asks
//! to read: the clock is then held until a reply has been staged.

use crate::comm::I2cComm;
use crate::dispatch;
use crate::message::{Mailbox, MessageTag};
use crate::registers::{SspRegisters, SspStatus};
use crate::{Error, ErrorCode, State};

/// Clocked out when there is nothing to reply with.
pub const FILLER_BYTE: u8 = 0xFF;

pub struct SlaveEngine {
    error_threshold: u8,
}

impl SlaveEngine {
    pub const fn new(error_threshold: u8) -> Self {
        Self { error_threshold }
    }

    pub fn on_event<R, M, S, const TX: usize, const RX: usize>(
        &mut self,
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        out: &M,
        samples: &S,
    ) where
        R: SspRegisters,
        M: Mailbox,
        S: Mailbox,
    {
        let status = regs.status();
        let mut overrun = false;

        if status.overrun {
            regs.clear_overrun();
            // The byte in flight is lost, so is the rest of this message.
            comm.set_state(State::Idle);
            comm.record_error(ErrorCode::Overrun);
            overrun = true;
        }

        let data = if status.buffer_full {
            Some(regs.read_buffer())
        } else {
            None
        };

        let mut release = data.is_some();
        let mut msg_ready = false;
        let mut msg_to_send = false;

        if !overrun {
            match comm.state() {
                State::Idle => {
                    if status.start {
                        Self::handle_start(comm, status, data.is_some());

                        if comm.state() == State::SlaveSend {
                            release = false;
                            msg_to_send = true;
                        }
                    } else if data.is_some() {
                        debug!("i2c slave: byte outside a transaction: {}", status);
                    }
                }
                State::Started => {
                    if status.stop {
                        comm.count_event();

                        if data.is_some() {
                            if status.data {
                                comm.record_error(ErrorCode::NoData);
                            } else {
                                // Addressed, then stopped: an empty write.
                                msg_ready = true;
                            }
                        } else {
                            debug!("i2c slave: empty transaction");
                        }

                        comm.set_state(State::Idle);
                    } else if data.is_some() {
                        comm.count_event();

                        if status.data {
                            comm.record_error(ErrorCode::NoData);
                            comm.set_state(State::Idle);
                        } else if status.read {
                            comm.set_state(State::SlaveSend);
                            release = false;
                            msg_to_send = true;
                        } else {
                            comm.set_state(State::RcvData);
                        }
                    }
                }
                State::RcvData => {
                    if status.stop {
                        comm.count_event();

                        match data {
                            Some(byte) if status.data => {
                                msg_ready = Self::append(comm, byte);
                            }
                            Some(_) => comm.record_error(ErrorCode::NoData),
                            None => msg_ready = true,
                        }

                        comm.set_state(State::Idle);
                    } else if let Some(byte) = data {
                        comm.count_event();

                        if status.data {
                            Self::append(comm, byte);
                        } else if status.read {
                            // Restart into a read: the write so far is a
                            // complete message and the command to answer.
                            comm.set_state(State::SlaveSend);
                            release = false;
                            msg_ready = true;
                            msg_to_send = true;
                        } else {
                            comm.record_error(ErrorCode::NoData);
                            comm.set_state(State::Idle);
                        }
                    }
                }
                State::SlaveSend => {
                    if status.stop {
                        // The master read less than was staged.
                        comm.send_buffer.reset();
                        comm.set_state(State::Idle);
                    } else if status.start {
                        comm.send_buffer.reset();
                        Self::handle_start(comm, status, data.is_some());

                        if comm.state() == State::SlaveSend {
                            release = false;
                            msg_to_send = true;
                        }
                    } else {
                        match comm.send_buffer.next() {
                            Some(byte) => {
                                regs.write_buffer(byte);
                                release = true;
                            }
                            None => comm.set_state(State::Idle),
                        }
                    }
                }
                state => {
                    debug!("i2c slave: ignoring event in {}: {}", state, status);
                }
            }
        }

        if release {
            regs.release_clock();
        }

        if msg_ready {
            let trailer = comm.event_count;

            match comm.receive_buffer.complete_with_trailer(trailer) {
                Some(message) => {
                    debug!("i2c slave: received {} bytes", message.len() - 1);
                    out.post(MessageTag::I2cData, message);
                }
                None => comm.record_error(ErrorCode::MessageTooLong),
            }
        }

        if msg_to_send {
            dispatch::dispatch(comm, regs, out, samples);
        }

        // After dispatch, so an unknown command is counted first.
        if comm.error_count > 0 && comm.error_count >= self.error_threshold {
            out.post(MessageTag::I2cDebug, &comm.take_diagnostic());
        }
    }

    fn handle_start<const TX: usize, const RX: usize>(
        comm: &mut I2cComm<TX, RX>,
        status: SspStatus,
        data_read: bool,
    ) {
        comm.event_count = 1;
        comm.receive_buffer.begin();

        // The address may arrive in the same interrupt as the start.
        if !data_read {
            comm.set_state(State::Started);
        } else if status.data {
            comm.set_state(State::Idle);
            comm.record_error(ErrorCode::NoAddress);
        } else if status.read {
            comm.set_state(State::SlaveSend);
        } else {
            comm.set_state(State::RcvData);
        }
    }

    /// Appends a received byte, abandoning the transaction if it would not
    /// leave room for the trailer.
    fn append<const TX: usize, const RX: usize>(comm: &mut I2cComm<TX, RX>, byte: u8) -> bool {
        if comm.receive_buffer.write_payload_byte(byte).is_ok() {
            true
        } else {
            comm.set_state(State::Idle);
            comm.record_error(ErrorCode::MessageTooLong);
            false
        }
    }

    /// Stages `payload`, loads its first byte and lets the master clock it out.
    pub fn begin_reply<R: SspRegisters, const TX: usize, const RX: usize>(
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        payload: &[u8],
    ) -> Result<(), Error> {
        if comm.state() != State::SlaveSend {
            return Err(Error::NotSending);
        }

        comm.send_buffer
            .write(payload)
            .map_err(|_| Error::PayloadTooLong)?;

        let first = comm.send_buffer.next().unwrap_or(FILLER_BYTE);
        regs.write_buffer(first);
        regs.release_clock();
        Ok(())
    }
}
