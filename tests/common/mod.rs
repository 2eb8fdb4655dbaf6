#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use mssp_i2c::{Ack, Mailbox, Message, SspRegisters, SspStatus, UartRegisters, MSGLEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    ConfigureMaster(u8),
    ConfigureSlave(u8),
    ClearOverrun,
    Write(u8),
    Start,
    RepeatedStart,
    Stop,
    EnableReceive,
    Acknowledge(Ack),
    ReleaseClock,
}

#[derive(Default)]
pub struct SspState {
    pub status: SspStatus,
    pub incoming: u8,
    pub ops: Vec<Op>,
}

/// Scripted serial port. Clones share the same state, so a test keeps one
/// handle while the driver owns another.
#[derive(Clone, Default)]
pub struct MockSsp(pub Rc<RefCell<SspState>>);

impl MockSsp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, status: SspStatus, incoming: u8) {
        let mut s = self.0.borrow_mut();
        s.status = status;
        s.incoming = incoming;
    }

    pub fn ops(&self) -> Vec<Op> {
        self.0.borrow().ops.clone()
    }

    pub fn take_ops(&self) -> Vec<Op> {
        std::mem::take(&mut self.0.borrow_mut().ops)
    }

    pub fn written(&self) -> Vec<u8> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    fn push(&self, op: Op) {
        self.0.borrow_mut().ops.push(op);
    }
}

impl SspRegisters for MockSsp {
    fn configure_master(&mut self, divisor: u8) {
        self.push(Op::ConfigureMaster(divisor));
    }

    fn configure_slave(&mut self, address: u8) {
        self.push(Op::ConfigureSlave(address));
    }

    fn status(&self) -> SspStatus {
        self.0.borrow().status
    }

    fn clear_overrun(&mut self) {
        self.0.borrow_mut().status.overrun = false;
        self.push(Op::ClearOverrun);
    }

    fn read_buffer(&mut self) -> u8 {
        let mut s = self.0.borrow_mut();
        s.status.buffer_full = false;
        s.incoming
    }

    fn write_buffer(&mut self, byte: u8) {
        self.push(Op::Write(byte));
    }

    fn start(&mut self) {
        self.push(Op::Start);
    }

    fn repeated_start(&mut self) {
        self.push(Op::RepeatedStart);
    }

    fn stop(&mut self) {
        self.push(Op::Stop);
    }

    fn enable_receive(&mut self) {
        self.push(Op::EnableReceive);
    }

    fn acknowledge(&mut self, ack: Ack) {
        self.push(Op::Acknowledge(ack));
    }

    fn release_clock(&mut self) {
        self.push(Op::ReleaseClock);
    }
}

// Slave-side status snapshots.

pub fn start() -> SspStatus {
    SspStatus {
        start: true,
        ..Default::default()
    }
}

pub fn address_write() -> SspStatus {
    SspStatus {
        buffer_full: true,
        ..Default::default()
    }
}

pub fn address_read() -> SspStatus {
    SspStatus {
        buffer_full: true,
        read: true,
        ..Default::default()
    }
}

pub fn start_address_read() -> SspStatus {
    SspStatus {
        start: true,
        ..address_read()
    }
}

pub fn data_byte() -> SspStatus {
    SspStatus {
        buffer_full: true,
        data: true,
        ..Default::default()
    }
}

pub fn stop() -> SspStatus {
    SspStatus {
        stop: true,
        ..Default::default()
    }
}

pub fn stop_with_data() -> SspStatus {
    SspStatus {
        stop: true,
        ..data_byte()
    }
}

pub fn overrun() -> SspStatus {
    SspStatus {
        overrun: true,
        ..data_byte()
    }
}

// Master-side status snapshots.

pub fn acked() -> SspStatus {
    SspStatus::default()
}

pub fn nacked() -> SspStatus {
    SspStatus {
        nack: true,
        ..Default::default()
    }
}

pub fn received() -> SspStatus {
    SspStatus {
        buffer_full: true,
        ..Default::default()
    }
}

pub fn drain<M: Mailbox>(queue: &M) -> Vec<Message> {
    std::iter::from_fn(|| queue.try_receive(MSGLEN)).collect()
}

#[derive(Default)]
pub struct UartState {
    pub incoming: VecDeque<u8>,
    pub overrun: bool,
    pub busy: bool,
    pub written: Vec<u8>,
    pub transmit_interrupt: bool,
    pub receiver_resets: usize,
}

#[derive(Clone, Default)]
pub struct MockUart(pub Rc<RefCell<UartState>>);

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self, byte: u8) {
        self.0.borrow_mut().incoming.push_back(byte);
    }
}

impl UartRegisters for MockUart {
    fn data_ready(&self) -> bool {
        !self.0.borrow().incoming.is_empty()
    }

    fn read(&mut self) -> u8 {
        self.0.borrow_mut().incoming.pop_front().unwrap_or(0)
    }

    fn overrun(&self) -> bool {
        self.0.borrow().overrun
    }

    fn reset_receiver(&mut self) {
        let mut s = self.0.borrow_mut();
        s.overrun = false;
        s.receiver_resets += 1;
    }

    fn transmit_idle(&self) -> bool {
        !self.0.borrow().busy
    }

    fn write(&mut self, byte: u8) {
        self.0.borrow_mut().written.push(byte);
    }

    fn set_transmit_interrupt(&mut self, enabled: bool) {
        self.0.borrow_mut().transmit_interrupt = enabled;
    }
}
