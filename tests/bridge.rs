mod common;

use common::*;
use fugit::HertzU32;
use mssp_i2c::interrupts::{
    handle_i2c_interrupt, handle_uart_receive_interrupt, handle_uart_transmit_interrupt,
};
use mssp_i2c::{
    Address, Bridge, Config, Error, Frequency, I2c, MessageTag, SspStatus, State, Uart, UartBridge,
};

type SlaveBridge = Bridge<MockSsp, 8, 8, 16>;

fn slave_bridge() -> (SlaveBridge, MockSsp) {
    let ssp = MockSsp::new();
    let bridge = SlaveBridge::new();
    bridge.install(I2c::new(ssp.clone(), Config::slave(Address::new(0x4F).unwrap())).unwrap());
    ssp.take_ops();
    (bridge, ssp)
}

fn interrupt(bridge: &SlaveBridge, ssp: &MockSsp, status: SspStatus, byte: u8) {
    ssp.set(status, byte);
    handle_i2c_interrupt(bridge);
}

#[test]
fn uart_sample_answers_gather_check() {
    let (bridge, ssp) = slave_bridge();

    let uart_regs = MockUart::new();
    let uart: UartBridge<MockUart, 4> = UartBridge::new();
    uart.install(Uart::new(uart_regs.clone()));

    for b in [0x10, 0x20, 0x30, 0x40, 0x50] {
        uart_regs.feed(b);
        handle_uart_receive_interrupt(&uart, bridge.samples());
    }

    interrupt(&bridge, &ssp, start(), 0);
    assert_eq!(bridge.state(), State::Started);
    interrupt(&bridge, &ssp, address_write(), 0x9E);
    interrupt(&bridge, &ssp, data_byte(), 0xAB);
    interrupt(&bridge, &ssp, stop(), 0);

    let data = bridge.try_receive().unwrap();
    assert_eq!(data.tag, MessageTag::I2cData);
    assert_eq!(data.payload, [0xAB, 4]);
    ssp.take_ops();

    interrupt(&bridge, &ssp, start_address_read(), 0x9F);
    assert_eq!(bridge.state(), State::SlaveSend);
    for _ in 0..5 {
        interrupt(&bridge, &ssp, SspStatus::default(), 0);
    }

    assert_eq!(ssp.written(), [0x10, 0x20, 0x30, 0x40, 0x50]);
    assert_eq!(bridge.state(), State::Idle);
    assert!(bridge.try_receive().is_none());
}

#[test]
fn uart_transmit_through_bridge() {
    let uart_regs = MockUart::new();
    let uart: UartBridge<MockUart, 4> = UartBridge::new();
    assert_eq!(uart.transmit(&[1]), Err(Error::Uninitialized));

    uart.install(Uart::new(uart_regs.clone()));
    uart.transmit(&[1, 2]).unwrap();
    for _ in 0..3 {
        handle_uart_transmit_interrupt(&uart);
    }
    assert_eq!(uart_regs.0.borrow().written, [1, 2]);
}

#[test]
fn master_state_is_mirrored() {
    let ssp = MockSsp::new();
    let bridge: Bridge<MockSsp, 4, 8, 8> = Bridge::new();
    let addr = Address::new(0x21).unwrap();

    assert_eq!(bridge.begin_write(&[1], addr), Err(Error::Uninitialized));
    assert!(bridge.dump_state().is_none());

    bridge.install(
        I2c::new(ssp.clone(), Config::master(HertzU32::MHz(12), Frequency::Standard)).unwrap(),
    );
    bridge.begin_write(&[1], addr).unwrap();
    assert_eq!(bridge.state(), State::WriteAddr);
    assert_eq!(bridge.begin_read(1), Err(Error::Busy));

    for _ in 0..3 {
        interrupt_master(&bridge, &ssp);
    }

    assert_eq!(bridge.state(), State::Idle);
    assert_eq!(bridge.try_receive().unwrap().tag, MessageTag::MasterSendComplete);

    let dump = bridge.dump_state().unwrap();
    assert_eq!(dump.current_state, State::Idle);
    assert_eq!(dump.event_count, 3);
}

fn interrupt_master(bridge: &Bridge<MockSsp, 4, 8, 8>, ssp: &MockSsp) {
    ssp.set(acked(), 0);
    handle_i2c_interrupt(bridge);
}

#[test]
fn interrupt_without_driver_is_harmless() {
    let bridge: Bridge<MockSsp, 4, 8, 8> = Bridge::new();
    handle_i2c_interrupt(&bridge);
    assert_eq!(bridge.state(), State::Idle);
    assert_eq!(bridge.begin_reply(&[1]), Err(Error::Uninitialized));
}
