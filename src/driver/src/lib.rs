//! serialcore
//!
//! Interrupt-driven UART driver for STM32F4-class microcontrollers, plus a
//! polled SPI master.
//!
//! # Architecture
//!
//! The crate is structured into the following modules:
//! - `sync`: lock-free ring buffer shared between main and interrupt context
//! - `serial`: UART controllers, peripheral descriptors and interrupt dispatch
//! - `spi`: synchronous single-byte bus transfers
//! - `arch`: board data (register addresses, IRQs, default pins) and vectors
//! - `testutil`: register-level fakes for running the driver on the host
//!
//! # Safety
//!
//! This is a `#![no_std]` driver. All unsafe code is documented with safety
//! invariants explaining why the usage is correct.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod arch;
pub mod config;
pub mod serial;
pub mod spi;
pub mod sync;
#[cfg(target_has_atomic = "64")]
pub mod testutil;

pub use serial::{dispatch, Descriptor, PeripheralId, Uart};
pub use serialcore_common::{mode, SerialMode, SpiError, UartError};
pub use spi::Spi;
