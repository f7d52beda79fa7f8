//! UART frame format and its single-byte encoding.
//!
//! The mode byte packs the frame as follows:
//!
//! | bits | field |
//! |------|-------|
//! | 1..=2 | data bits (`0b10` = 7, `0b11` = 8) |
//! | 3 | stop bits (`0` = 1, `1` = 2) |
//! | 4..=5 | parity (`0b00` none, `0b10` even, `0b11` odd) |
//!
//! Everything else must be zero.

use crate::error::UartError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of data bits per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    /// 7 data bits.
    Seven,
    /// 8 data bits.
    Eight,
}

/// Parity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    /// No parity bit.
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// A supported UART frame format.
///
/// Only the combinations below are representable; 7 data bits without parity
/// does not fit the peripheral's word-length setting and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialMode {
    data_bits: DataBits,
    parity: Parity,
    stop_bits: StopBits,
}

/// 8 data bits, no parity, 1 stop bit.
pub const SERIAL_8N1: SerialMode = SerialMode::new(DataBits::Eight, Parity::None, StopBits::One);
/// 8 data bits, no parity, 2 stop bits.
pub const SERIAL_8N2: SerialMode = SerialMode::new(DataBits::Eight, Parity::None, StopBits::Two);
/// 7 data bits, even parity, 1 stop bit.
pub const SERIAL_7E1: SerialMode = SerialMode::new(DataBits::Seven, Parity::Even, StopBits::One);
/// 8 data bits, even parity, 1 stop bit.
pub const SERIAL_8E1: SerialMode = SerialMode::new(DataBits::Eight, Parity::Even, StopBits::One);
/// 7 data bits, even parity, 2 stop bits.
pub const SERIAL_7E2: SerialMode = SerialMode::new(DataBits::Seven, Parity::Even, StopBits::Two);
/// 8 data bits, even parity, 2 stop bits.
pub const SERIAL_8E2: SerialMode = SerialMode::new(DataBits::Eight, Parity::Even, StopBits::Two);
/// 7 data bits, odd parity, 1 stop bit.
pub const SERIAL_7O1: SerialMode = SerialMode::new(DataBits::Seven, Parity::Odd, StopBits::One);
/// 8 data bits, odd parity, 1 stop bit.
pub const SERIAL_8O1: SerialMode = SerialMode::new(DataBits::Eight, Parity::Odd, StopBits::One);
/// 7 data bits, odd parity, 2 stop bits.
pub const SERIAL_7O2: SerialMode = SerialMode::new(DataBits::Seven, Parity::Odd, StopBits::Two);
/// 8 data bits, odd parity, 2 stop bits.
pub const SERIAL_8O2: SerialMode = SerialMode::new(DataBits::Eight, Parity::Odd, StopBits::Two);

const DATA_SHIFT: u8 = 1;
const STOP_TWO: u8 = 1 << 3;
const PARITY_SHIFT: u8 = 4;
const VALID_BITS: u8 = 0x3E;

impl SerialMode {
    const fn new(data_bits: DataBits, parity: Parity, stop_bits: StopBits) -> Self {
        Self {
            data_bits,
            parity,
            stop_bits,
        }
    }

    /// Decodes a mode byte, rejecting anything outside the supported table.
    pub fn from_bits(raw: u8) -> Result<Self, UartError> {
        if raw & !VALID_BITS != 0 {
            return Err(UartError::UnsupportedMode(raw));
        }

        let data_bits = match (raw >> DATA_SHIFT) & 0b11 {
            0b10 => DataBits::Seven,
            0b11 => DataBits::Eight,
            _ => return Err(UartError::UnsupportedMode(raw)),
        };
        let parity = match (raw >> PARITY_SHIFT) & 0b11 {
            0b00 => Parity::None,
            0b10 => Parity::Even,
            0b11 => Parity::Odd,
            _ => return Err(UartError::UnsupportedMode(raw)),
        };
        let stop_bits = if raw & STOP_TWO != 0 {
            StopBits::Two
        } else {
            StopBits::One
        };

        if data_bits == DataBits::Seven && parity == Parity::None {
            return Err(UartError::UnsupportedMode(raw));
        }

        Ok(Self::new(data_bits, parity, stop_bits))
    }

    /// Encodes this mode as its `SERIAL_*` byte.
    pub const fn bits(self) -> u8 {
        let data = match self.data_bits {
            DataBits::Seven => 0b10,
            DataBits::Eight => 0b11,
        };
        let parity = match self.parity {
            Parity::None => 0b00,
            Parity::Even => 0b10,
            Parity::Odd => 0b11,
        };
        let stop = match self.stop_bits {
            StopBits::One => 0,
            StopBits::Two => STOP_TWO,
        };
        (data << DATA_SHIFT) | stop | (parity << PARITY_SHIFT)
    }

    /// Data bits per frame.
    pub const fn data_bits(self) -> DataBits {
        self.data_bits
    }

    /// Parity setting.
    pub const fn parity(self) -> Parity {
        self.parity
    }

    /// Stop bits per frame.
    pub const fn stop_bits(self) -> StopBits {
        self.stop_bits
    }

    /// Mask applied to received data; the parity bit is not data.
    pub const fn data_mask(self) -> u8 {
        match self.data_bits {
            DataBits::Seven => 0x7F,
            DataBits::Eight => 0xFF,
        }
    }
}

impl Default for SerialMode {
    fn default() -> Self {
        SERIAL_8N1
    }
}

impl TryFrom<u8> for SerialMode {
    type Error = UartError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::from_bits(raw)
    }
}
