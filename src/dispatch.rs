//! Commands answered by the slave when the master reads back.
//!
//! The first byte of the last message written to this device selects the
//! reply staged for the read that follows it.

use crate::comm::I2cComm;
use crate::message::{Mailbox, MessageTag};
use crate::registers::SspRegisters;
use crate::slave::SlaveEngine;
use crate::uart::UART_FRAME_LEN;
use crate::ErrorCode;

/// Ask the main task to start gathering sensor data.
pub const GATHER_REQUEST: u8 = 0xAA;
/// Poll for a sensor sample gathered since the last request.
pub const GATHER_CHECK: u8 = 0xAB;
/// Forward a movement command to the main task.
pub const MOVEMENT_COMMAND: u8 = 0xBA;

const GATHER_ACK: [u8; 3] = [0x00, 0x01, 0x01];
const MOVEMENT_ACK: [u8; 3] = [0x02, 0x01, 0x01];
const NO_SAMPLE: [u8; UART_FRAME_LEN] = [0; UART_FRAME_LEN];

pub(crate) fn dispatch<R, M, S, const TX: usize, const RX: usize>(
    comm: &mut I2cComm<TX, RX>,
    regs: &mut R,
    out: &M,
    samples: &S,
) where
    R: SspRegisters,
    M: Mailbox,
    S: Mailbox,
{
    let command = comm.receive_buffer.last_message().first().copied();

    let staged = match command {
        Some(GATHER_REQUEST) => {
            debug!("i2c slave: gather request");
            let staged = SlaveEngine::begin_reply(comm, regs, &GATHER_ACK);
            out.post(MessageTag::GatherRequest, &[GATHER_REQUEST, 0, 0, 0, 0]);
            staged
        }
        Some(GATHER_CHECK) => {
            let sample = samples
                .try_receive(UART_FRAME_LEN)
                .filter(|m| m.tag == MessageTag::UartData && m.payload.len() == UART_FRAME_LEN);

            match sample {
                Some(sample) => {
                    debug!("i2c slave: gather check, sample {}", sample.payload);
                    SlaveEngine::begin_reply(comm, regs, &sample.payload)
                }
                None => {
                    debug!("i2c slave: gather check, no sample");
                    SlaveEngine::begin_reply(comm, regs, &NO_SAMPLE)
                }
            }
        }
        Some(MOVEMENT_COMMAND) => {
            debug!("i2c slave: movement command");
            let staged = SlaveEngine::begin_reply(comm, regs, &MOVEMENT_ACK);
            out.post(
                MessageTag::MovementCommand,
                comm.receive_buffer.last_message(),
            );
            staged
        }
        _ => {
            comm.record_error(ErrorCode::UnknownCommand);
            SlaveEngine::begin_reply(comm, regs, &[])
        }
    };

    if staged.is_err() {
        // The master is already clocking; never leave the bus stretched.
        warn!("i2c slave: reply does not fit, sending filler");
        let _ = SlaveEngine::begin_reply(comm, regs, &[]);
    }
}
