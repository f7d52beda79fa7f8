//! Static, read-only description of one USART instance.

use serialcore_hal::{ClockGate, UsartRegisters};

/// Identity of a physical USART.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeripheralId {
    /// USART1 (`Serial1`).
    Usart1,
    /// USART2 (`Serial2`).
    Usart2,
    /// USART3 (`Serial3`).
    Usart3,
}

impl PeripheralId {
    /// Number of USART instances.
    pub const COUNT: usize = 3;

    /// All instances, in index order.
    pub const ALL: [PeripheralId; Self::COUNT] =
        [PeripheralId::Usart1, PeripheralId::Usart2, PeripheralId::Usart3];

    /// Position of this instance in per-peripheral tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Everything that is fixed about one USART for the life of the program.
pub struct Descriptor {
    /// Which peripheral this is.
    pub id: PeripheralId,
    /// The peripheral's register block.
    pub regs: &'static dyn UsartRegisters,
    /// Interrupt vector number.
    pub irq: u16,
    /// Clock enable bit.
    pub clock: ClockGate,
    /// Default TX pin.
    pub tx_pin: u8,
    /// Default RX pin.
    pub rx_pin: u8,
    /// Alternate function that routes the pins to this peripheral.
    pub af: u8,
    /// Whether an external bootloader watches this port after reset.
    pub shares_bootloader: bool,
}

impl core::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("irq", &self.irq)
            .field("clock", &self.clock)
            .field("tx_pin", &self.tx_pin)
            .field("rx_pin", &self.rx_pin)
            .field("af", &self.af)
            .field("shares_bootloader", &self.shares_bootloader)
            .finish_non_exhaustive()
    }
}
