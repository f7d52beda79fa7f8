//! Error types for the serial peripherals.

use core::fmt;

/// UART configuration error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UartError {
    /// Mode byte is not one of the supported `SERIAL_*` values
    UnsupportedMode(u8),
    /// Baud rate cannot be produced from the bus clock
    InvalidBaud(u32),
    /// No controller is registered for the peripheral
    UnknownPeripheral,
    /// The interrupt dispatch table was already installed
    TableAlreadyInstalled,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::UnsupportedMode(raw) => write!(f, "unsupported serial mode {:#04x}", raw),
            UartError::InvalidBaud(baud) => write!(f, "baud rate {} out of range", baud),
            UartError::UnknownPeripheral => write!(f, "no controller registered for peripheral"),
            UartError::TableAlreadyInstalled => write!(f, "dispatch table already installed"),
        }
    }
}

/// SPI bus error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpiError {
    /// Transfer attempted before `begin`
    NotEnabled,
    /// Status flag never came up
    Timeout,
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::NotEnabled => write!(f, "SPI peripheral not enabled"),
            SpiError::Timeout => write!(f, "SPI transfer timed out"),
        }
    }
}
