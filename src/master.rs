//! Interrupt-driven master state machine.
//!
//! Every peripheral interrupt advances the machine by one transition. A write
//! goes `WriteAddr -> WriteData* -> RepStart`, then either stops (write only)
//! or pivots to a read through a repeated start: `WriteAddr -> RcvData -> Ack
//! -> (RcvData -> Ack)* -> EndWrite -> Idle`.

use crate::comm::I2cComm;
use crate::config::Address;
use crate::message::{Mailbox, MessageTag};
use crate::registers::{Ack, SspRegisters};
use crate::{Error, ErrorCode, State};

enum StartKind {
    Start,
    Repeated,
}

pub struct MasterEngine {
    retries: u8,
    max_retries: Option<u8>,
}

impl MasterEngine {
    pub const fn new(max_retries: Option<u8>) -> Self {
        Self {
            retries: 0,
            max_retries,
        }
    }

    /// Stages `payload` for `address` and issues a start condition. When
    /// `receive_length` is non-zero the write is followed by a read of that
    /// many bytes.
    pub fn begin_write<R: SspRegisters, const TX: usize, const RX: usize>(
        &mut self,
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        payload: &[u8],
        address: Address,
        receive_length: usize,
    ) -> Result<(), Error> {
        if !comm.state().is_idle() {
            return Err(Error::Busy);
        }

        comm.receive_buffer
            .set_target(receive_length)
            .map_err(|_| Error::ReadTooLong)?;
        comm.send_buffer
            .write(payload)
            .map_err(|_| Error::PayloadTooLong)?;

        comm.slave_address = address.write();
        comm.event_count = 0;
        self.retries = 0;

        debug!(
            "i2c master: write {} bytes to {:#x}, then read {}",
            payload.len(),
            comm.slave_address,
            receive_length
        );

        comm.set_state(State::WriteAddr);
        regs.start();
        Ok(())
    }

    /// Reads `length` bytes from the address of the previous write. Issues a
    /// plain start: that write's stop released the bus.
    pub fn begin_read<R: SspRegisters, const TX: usize, const RX: usize>(
        &mut self,
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        length: usize,
    ) -> Result<(), Error> {
        if !comm.state().is_idle() {
            return Err(Error::Busy);
        }

        comm.receive_buffer
            .set_target(length)
            .map_err(|_| Error::ReadTooLong)?;
        comm.event_count = 0;

        Self::start_read(comm, regs, StartKind::Start);
        Ok(())
    }

    fn start_read<R: SspRegisters, const TX: usize, const RX: usize>(
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        kind: StartKind,
    ) {
        comm.slave_address |= 0x01;
        comm.set_state(State::WriteAddr);

        match kind {
            StartKind::Start => regs.start(),
            StartKind::Repeated => regs.repeated_start(),
        }
    }

    pub fn on_event<R: SspRegisters, M: Mailbox, const TX: usize, const RX: usize>(
        &mut self,
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        out: &M,
    ) {
        let state = comm.state();

        if state.is_idle() {
            return;
        }

        comm.count_event();
        let status = regs.status();

        match state {
            State::WriteAddr => {
                comm.receive_buffer.begin();
                regs.write_buffer(comm.slave_address);

                comm.set_state(if comm.slave_address & 0x01 == 0x01 {
                    State::RcvData
                } else {
                    State::WriteData
                });
            }
            State::WriteData => {
                if status.nack {
                    return self.retry(comm, regs, out);
                }

                match comm.send_buffer.next() {
                    Some(byte) => {
                        regs.write_buffer(byte);

                        if comm.send_buffer.is_empty() {
                            comm.set_state(State::RepStart);
                        }
                    }
                    // Empty payload, the address ACK completes the write.
                    None => self.finish_write(comm, regs, out),
                }
            }
            State::RepStart => {
                if status.nack {
                    return self.retry(comm, regs, out);
                }

                self.finish_write(comm, regs, out);
            }
            State::RcvData => {
                if status.nack {
                    comm.record_error(ErrorCode::BusNack);
                    regs.stop();
                    out.post(MessageTag::MasterRecvFailed, &[]);
                    comm.set_state(State::Idle);
                } else {
                    regs.enable_receive();
                    comm.set_state(State::Ack);
                }
            }
            State::Ack => {
                let byte = regs.read_buffer();

                if !comm.receive_buffer.is_complete() {
                    // The target was capacity-checked when the read was requested.
                    let _ = comm.receive_buffer.write_byte(byte);
                }

                if comm.receive_buffer.is_complete() {
                    regs.acknowledge(Ack::Nack);
                    debug!(
                        "i2c master: read complete, {} bytes",
                        comm.receive_buffer.get_size()
                    );
                    out.post(MessageTag::MasterRecvComplete, comm.receive_buffer.filled());
                    comm.set_state(State::EndWrite);
                } else {
                    regs.acknowledge(Ack::Ack);
                    comm.set_state(State::RcvData);
                }
            }
            State::EndWrite => {
                regs.stop();
                comm.set_state(State::Idle);
            }
            State::Idle | State::Started | State::SlaveSend => {
                debug!("i2c master: ignoring event in {}: {}", state, status);
            }
        }
    }

    fn finish_write<R: SspRegisters, M: Mailbox, const TX: usize, const RX: usize>(
        &mut self,
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        out: &M,
    ) {
        if comm.receive_buffer.target() > 0 {
            comm.set_state(State::Idle);
            Self::start_read(comm, regs, StartKind::Repeated);
        } else {
            regs.stop();
            out.post(MessageTag::MasterSendComplete, &[]);
            comm.set_state(State::Idle);
        }
    }

    fn retry<R: SspRegisters, M: Mailbox, const TX: usize, const RX: usize>(
        &mut self,
        comm: &mut I2cComm<TX, RX>,
        regs: &mut R,
        out: &M,
    ) {
        comm.record_error(ErrorCode::BusNack);

        if self.max_retries.is_some_and(|max| self.retries >= max) {
            warn!("i2c master: giving up after {} retries", self.retries);
            regs.stop();
            comm.send_buffer.reset();
            out.post(MessageTag::MasterSendFailed, &[]);
            comm.set_state(State::Idle);
            return;
        }

        debug!(
            "i2c master: nack after {} bytes, retry {}",
            comm.send_buffer.bytes_sent(),
            self.retries
        );
        self.retries = self.retries.saturating_add(1);
        comm.send_buffer.rewind();
        comm.set_state(State::WriteAddr);
        regs.repeated_start();
    }
}
