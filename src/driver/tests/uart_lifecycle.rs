mod common;

use common::{bootloader_port, plain_port};
use serialcore::arch::stm32f4::pins::{PB6, PB7};
use serialcore::mode::{SERIAL_7E1, SERIAL_8N2, SERIAL_8O1};
use serialcore::serial::State;
use serialcore::testutil::FakeBoard;
use serialcore::UartError;
use serialcore_common::regs::{UsartCr1, USART_CR2_STOP_2, USART_CR2_STOP_MASK};

#[test]
fn test_new_controller_is_idle() {
    let rig = plain_port();
    assert_eq!(rig.uart.state(), State::Idle);
    assert!(rig.uart.is_usable());
    assert_eq!(rig.uart.config(), None);
    assert_eq!(rig.uart.available(), 0);
    assert_eq!(rig.uart.read(), None);
    assert_eq!(rig.uart.peek(), None);
}

#[test]
fn test_begin_programs_peripheral() {
    let rig = bootloader_port();
    rig.uart.begin(115_200).expect("begin");

    assert_eq!(rig.uart.state(), State::Active);
    assert!(rig.board.clock_enabled(rig.descriptor.clock));
    assert!(rig.board.irq_enabled(rig.descriptor.irq));
    assert_eq!(rig.board.alternate_function(rig.descriptor.tx_pin), Some(7));
    assert_eq!(rig.board.alternate_function(rig.descriptor.rx_pin), Some(7));

    // 84 MHz / 115200, rounded
    assert_eq!(rig.regs.brr(), 729);
    let cr1 = rig.regs.cr1();
    assert!(cr1.contains(UsartCr1::UE | UsartCr1::TE | UsartCr1::RE | UsartCr1::RXNEIE));
    assert!(!cr1.contains(UsartCr1::TXEIE));
    assert!(!cr1.intersects(UsartCr1::PCE | UsartCr1::M));
    assert_eq!(rig.regs.cr2() & USART_CR2_STOP_MASK, 0);

    let config = rig.uart.config().expect("configured");
    assert_eq!(config.baud, 115_200);
    assert_eq!(config.mode.bits(), 0x06);
}

#[test]
fn test_begin_uses_bus_clock_of_peripheral() {
    let rig = plain_port();
    rig.uart.begin(9_600).expect("begin");
    assert_eq!(rig.regs.brr(), FakeBoard::APB1_HZ / 9_600);
}

#[test]
fn test_begin_frame_formats() {
    let rig = plain_port();

    rig.uart.begin_with_mode(9_600, SERIAL_8O1).expect("8O1");
    let cr1 = rig.regs.cr1();
    assert!(cr1.contains(UsartCr1::PCE | UsartCr1::PS | UsartCr1::M));

    rig.uart.begin_with_mode(9_600, SERIAL_7E1).expect("7E1");
    let cr1 = rig.regs.cr1();
    assert!(cr1.contains(UsartCr1::PCE));
    assert!(!cr1.intersects(UsartCr1::PS | UsartCr1::M));

    rig.uart.begin_with_mode(9_600, SERIAL_8N2).expect("8N2");
    assert_eq!(rig.regs.cr2() & USART_CR2_STOP_MASK, USART_CR2_STOP_2);
}

#[test]
fn test_begin_raw_rejects_unknown_mode() {
    let rig = plain_port();
    assert_eq!(
        rig.uart.begin_raw(9_600, 0x04),
        Err(UartError::UnsupportedMode(0x04))
    );
    assert_eq!(rig.uart.state(), State::Idle);
    assert!(!rig.board.clock_enabled(rig.descriptor.clock));

    rig.uart.begin_raw(9_600, 0x3E).expect("8O2");
    assert_eq!(rig.uart.config().map(|c| c.mode.bits()), Some(0x3E));
}

#[test]
fn test_begin_rejects_bad_baud() {
    let rig = plain_port();
    assert_eq!(rig.uart.begin(0), Err(UartError::InvalidBaud(0)));
    assert_eq!(rig.uart.begin(50), Err(UartError::InvalidBaud(50)));
    assert_eq!(rig.uart.state(), State::Idle);
}

#[test]
fn test_set_pins_before_begin() {
    let rig = bootloader_port();
    rig.uart.set_pins(PB6, PB7);
    rig.uart.begin(9_600).expect("begin");

    assert_eq!(rig.board.alternate_function(PB6), Some(7));
    assert_eq!(rig.board.alternate_function(PB7), Some(7));
    assert_eq!(rig.board.alternate_function(rig.descriptor.tx_pin), None);
}

#[test]
fn test_set_pins_while_active_applies_on_next_begin() {
    let rig = plain_port();
    rig.uart.begin(9_600).expect("begin");
    rig.uart.set_pins(PB6, PB7);
    assert_eq!(rig.board.alternate_function(PB6), None);

    rig.uart.begin(9_600).expect("re-begin");
    assert_eq!(rig.board.alternate_function(PB6), Some(7));
}

#[test]
fn test_end_releases_peripheral() {
    let rig = plain_port();
    rig.uart.begin(9_600).expect("begin");
    rig.uart.write(b'x');
    rig.uart.end();

    assert_eq!(rig.uart.state(), State::Idle);
    assert!(!rig.board.irq_enabled(rig.descriptor.irq));
    assert!(!rig.board.clock_enabled(rig.descriptor.clock));
    assert!(!rig.regs.rx_interrupt_enabled());
    assert!(!rig.regs.tx_interrupt_enabled());
    assert!(rig.uart.write_complete());

    // Idempotent
    rig.uart.end();
    assert_eq!(rig.uart.state(), State::Idle);
}

#[test]
fn test_end_begin_cycle_resets_rx() {
    let rig = plain_port();
    rig.uart.begin(9_600).expect("begin");
    rig.regs.inject(b'a');
    rig.regs.inject(b'b');
    rig.run_interrupts();
    assert_eq!(rig.uart.available(), 2);

    rig.uart.end();
    rig.uart.begin(9_600).expect("begin again");
    assert_eq!(rig.uart.available(), 0);
    assert_eq!(rig.uart.read(), None);
}

#[test]
fn test_begin_while_active_clears_buffers() {
    let rig = plain_port();
    rig.uart.begin(9_600).expect("begin");
    rig.regs.inject(b'a');
    rig.run_interrupts();
    assert_eq!(rig.uart.write(b'z'), 1);

    rig.uart.begin(19_200).expect("re-begin");
    assert_eq!(rig.uart.state(), State::Active);
    assert_eq!(rig.uart.available(), 0);
    assert!(!rig.regs.tx_interrupt_enabled());
    assert!(rig.uart.write_complete());
    assert_eq!(rig.uart.config().map(|c| c.baud), Some(19_200));
}

#[test]
fn test_write_before_begin_is_dropped() {
    let rig = plain_port();
    assert_eq!(rig.uart.write(b'x'), 0);
    assert!(!rig.regs.tx_interrupt_enabled());
    assert!(rig.wire().is_empty());
}
