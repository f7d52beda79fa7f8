//! Settings for the synchronous bus-transfer peripheral.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bit order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BitOrder {
    /// Most significant bit first.
    #[default]
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// Clock polarity/phase combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataMode {
    /// CPOL = 0, CPHA = 0.
    #[default]
    Mode0,
    /// CPOL = 0, CPHA = 1.
    Mode1,
    /// CPOL = 1, CPHA = 0.
    Mode2,
    /// CPOL = 1, CPHA = 1.
    Mode3,
}

impl DataMode {
    /// Clock idles high.
    pub const fn cpol(self) -> bool {
        matches!(self, DataMode::Mode2 | DataMode::Mode3)
    }

    /// Data captured on the second clock edge.
    pub const fn cpha(self) -> bool {
        matches!(self, DataMode::Mode1 | DataMode::Mode3)
    }
}

impl TryFrom<u8> for DataMode {
    type Error = u8;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(DataMode::Mode0),
            1 => Ok(DataMode::Mode1),
            2 => Ok(DataMode::Mode2),
            3 => Ok(DataMode::Mode3),
            other => Err(other),
        }
    }
}

/// Serial clock divider relative to the bus clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockDivider {
    /// Bus clock / 2.
    Div2,
    /// Bus clock / 4.
    #[default]
    Div4,
    /// Bus clock / 8.
    Div8,
    /// Bus clock / 16.
    Div16,
    /// Bus clock / 32.
    Div32,
    /// Bus clock / 64.
    Div64,
    /// Bus clock / 128.
    Div128,
    /// Bus clock / 256.
    Div256,
}

impl ClockDivider {
    /// Baud-rate control field value (0 = /2 ... 7 = /256).
    pub const fn prescaler_bits(self) -> u32 {
        self as u32
    }

    /// The divisor itself.
    pub const fn divisor(self) -> u32 {
        2 << (self as u32)
    }
}
