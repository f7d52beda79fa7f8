//! Register bit layouts for the STM32F4 USART and SPI blocks.

use bitflags::bitflags;

bitflags! {
    /// USART status register (SR).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UsartStatus: u32 {
        const PE   = 1 << 0; // Parity error
        const FE   = 1 << 1; // Framing error
        const NF   = 1 << 2; // Noise detected
        const ORE  = 1 << 3; // Overrun
        const IDLE = 1 << 4;
        const RXNE = 1 << 5; // Read data register not empty
        const TC   = 1 << 6; // Transmission complete
        const TXE  = 1 << 7; // Transmit data register empty
    }
}

bitflags! {
    /// Receive line errors latched by the interrupt handler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LineErrors: u32 {
        const PARITY  = UsartStatus::PE.bits();
        const FRAMING = UsartStatus::FE.bits();
        const NOISE   = UsartStatus::NF.bits();
        const OVERRUN = UsartStatus::ORE.bits();
    }
}

impl From<UsartStatus> for LineErrors {
    fn from(status: UsartStatus) -> Self {
        LineErrors::from_bits_truncate(status.bits())
    }
}

bitflags! {
    /// USART control register 1 (CR1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UsartCr1: u32 {
        const RE     = 1 << 2;  // Receiver enable
        const TE     = 1 << 3;  // Transmitter enable
        const RXNEIE = 1 << 5;  // RX-not-empty interrupt enable
        const TCIE   = 1 << 6;
        const TXEIE  = 1 << 7;  // TX-empty interrupt enable
        const PS     = 1 << 9;  // Odd parity
        const PCE    = 1 << 10; // Parity control enable
        const M      = 1 << 12; // 9-bit word
        const UE     = 1 << 13; // USART enable
    }
}

/// CR2 stop-bit field.
pub const USART_CR2_STOP_MASK: u32 = 0b11 << 12;
/// CR2 stop-bit field value for two stop bits.
pub const USART_CR2_STOP_2: u32 = 0b10 << 12;

bitflags! {
    /// SPI status register (SR).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiStatus: u32 {
        const RXNE = 1 << 0;
        const TXE  = 1 << 1;
        const BSY  = 1 << 7;
    }
}

bitflags! {
    /// SPI control register 1 (CR1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiCr1: u32 {
        const CPHA     = 1 << 0;
        const CPOL     = 1 << 1;
        const MSTR     = 1 << 2;
        const BR       = 0b111 << 3; // Baud-rate prescaler field
        const SPE      = 1 << 6;
        const LSBFIRST = 1 << 7;
        const SSI      = 1 << 8;
        const SSM      = 1 << 9;
    }
}

/// Shift of the SPI prescaler field in CR1.
pub const SPI_CR1_BR_SHIFT: u32 = 3;
