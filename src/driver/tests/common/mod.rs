//! Shared fixtures for the host-side integration tests.

#![allow(dead_code)]

use serialcore::arch::stm32f4::pins::{PA10, PA9, PB3, PB4};
use serialcore::serial::{Descriptor, PeripheralId, Uart};
use serialcore::testutil::{FakeBoard, FakeUsart};
use serialcore_hal::{Bus, ClockGate};

/// Upper bound on interrupt servicing loops, so a broken driver fails
/// instead of hanging.
pub const MAX_INTERRUPTS: usize = 1_000;

pub struct Rig {
    pub regs: &'static FakeUsart,
    pub board: &'static FakeBoard,
    pub descriptor: &'static Descriptor,
    pub uart: &'static Uart,
}

pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// A USART1 look-alike on its own fake registers and board.
pub fn bootloader_port() -> Rig {
    rig(PeripheralId::Usart1, true)
}

/// A USART2 look-alike without a boot guard.
pub fn plain_port() -> Rig {
    rig(PeripheralId::Usart2, false)
}

pub fn rig(id: PeripheralId, shares_bootloader: bool) -> Rig {
    let regs = leak(FakeUsart::new());
    let board = leak(FakeBoard::new());
    let (clock, irq, tx_pin, rx_pin) = match id {
        PeripheralId::Usart1 => (ClockGate { bus: Bus::Apb2, bit: 4 }, 37, PA9, PA10),
        _ => (ClockGate { bus: Bus::Apb1, bit: 17 }, 38, PB3, PB4),
    };
    let descriptor = leak(Descriptor {
        id,
        regs,
        irq,
        clock,
        tx_pin,
        rx_pin,
        af: 7,
        shares_bootloader,
    });
    let uart = leak(Uart::new(descriptor, board));
    Rig {
        regs,
        board,
        descriptor,
        uart,
    }
}

impl Rig {
    /// Service interrupts until no enabled source is pending.
    pub fn run_interrupts(&self) -> usize {
        let mut count = 0;
        while self.regs.interrupt_pending() {
            assert!(count < MAX_INTERRUPTS, "interrupt storm");
            self.uart.handle_interrupt();
            count += 1;
        }
        count
    }

    /// Everything the driver has put on the wire so far.
    pub fn wire(&self) -> Vec<u8> {
        std::iter::from_fn(|| self.regs.transmitted()).collect()
    }
}
