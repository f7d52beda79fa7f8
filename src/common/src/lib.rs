//! Types shared between the serialcore driver and its users.

#![no_std]

pub mod error;
pub mod mode;
pub mod regs;
pub mod spi;

pub use error::{SpiError, UartError};
pub use mode::{DataBits, Parity, SerialMode, StopBits};
pub use spi::{BitOrder, ClockDivider, DataMode};
