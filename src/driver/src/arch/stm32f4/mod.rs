//! STM32F4 support.
//!
//! Register-block addresses, interrupt numbers, clock gates and default pin
//! routing for the three USARTs and SPI1.

pub mod interrupts;
pub mod mmio;
pub mod pins;

use serialcore_hal::{Bus, ClockGate};

use crate::serial::{Descriptor, PeripheralId};
use crate::spi::{SpiDescriptor, SpiPins};
use mmio::{SpiMmio, UsartMmio};
use pins::*;

/// Alternate function routing USART1..3 to their pins.
pub const AF_USART: u8 = 7;
/// Alternate function routing SPI1 to its pins.
pub const AF_SPI1: u8 = 5;

// SAFETY: These are the documented register-block base addresses of the
// STM32F4 reference manual (RM0090, memory map).
static USART1_REGS: UsartMmio = unsafe { UsartMmio::new(0x4001_1000) };
static USART2_REGS: UsartMmio = unsafe { UsartMmio::new(0x4000_4400) };
static USART3_REGS: UsartMmio = unsafe { UsartMmio::new(0x4000_4800) };
static SPI1_REGS: SpiMmio = unsafe { SpiMmio::new(0x4001_3000) };

/// `Serial1`. Shares its pins with the system bootloader.
pub static USART1: Descriptor = Descriptor {
    id: PeripheralId::Usart1,
    regs: &USART1_REGS,
    irq: 37,
    clock: ClockGate {
        bus: Bus::Apb2,
        bit: 4,
    },
    tx_pin: PA9,
    rx_pin: PA10,
    af: AF_USART,
    shares_bootloader: true,
};

/// `Serial2`.
pub static USART2: Descriptor = Descriptor {
    id: PeripheralId::Usart2,
    regs: &USART2_REGS,
    irq: 38,
    clock: ClockGate {
        bus: Bus::Apb1,
        bit: 17,
    },
    tx_pin: PB3,
    rx_pin: PB4,
    af: AF_USART,
    shares_bootloader: false,
};

/// `Serial3`.
pub static USART3: Descriptor = Descriptor {
    id: PeripheralId::Usart3,
    regs: &USART3_REGS,
    irq: 39,
    clock: ClockGate {
        bus: Bus::Apb1,
        bit: 18,
    },
    tx_pin: PB8,
    rx_pin: PB9,
    af: AF_USART,
    shares_bootloader: false,
};

/// All USART descriptors, indexed by [`PeripheralId::index`].
pub static USARTS: [&Descriptor; PeripheralId::COUNT] = [&USART1, &USART2, &USART3];

/// SPI1 with its default pins.
pub static SPI1: SpiDescriptor = SpiDescriptor {
    regs: &SPI1_REGS,
    irq: 35,
    clock: ClockGate {
        bus: Bus::Apb2,
        bit: 12,
    },
    pins: SpiPins {
        sck: PA5,
        af_sck: AF_SPI1,
        miso: PB4,
        af_miso: AF_SPI1,
        mosi: PB5,
        af_mosi: AF_SPI1,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table_matches_ids() {
        for (index, descriptor) in USARTS.iter().enumerate() {
            assert_eq!(descriptor.id.index(), index);
            assert_eq!(descriptor.af, AF_USART);
        }
    }

    #[test]
    fn test_only_serial1_shares_bootloader() {
        assert!(USART1.shares_bootloader);
        assert!(!USART2.shares_bootloader);
        assert!(!USART3.shares_bootloader);
    }

    #[test]
    fn test_default_pins() {
        assert_eq!((USART1.tx_pin, USART1.rx_pin), (PA9, PA10));
        assert_eq!((USART2.tx_pin, USART2.rx_pin), (PB3, PB4));
        assert_eq!((USART3.tx_pin, USART3.rx_pin), (PB8, PB9));
        assert_eq!(SPI1.pins.sck, PA5);
    }
}
