//! Compile-time driver configuration.

use serialcore_common::mode::{SerialMode, SERIAL_8N1};

/// Receive buffer size per UART, in bytes. Must be a power of two.
pub const RX_BUFFER_SIZE: usize = 64;

/// Transmit buffer size per UART, in bytes. Must be a power of two.
pub const TX_BUFFER_SIZE: usize = 64;

/// How long output stays suppressed after `begin` on the bootloader port.
pub const BOOT_GUARD_MS: u32 = 1000;

/// Frame format used by `Uart::begin`.
pub const DEFAULT_MODE: SerialMode = SERIAL_8N1;

/// Status-flag polls before an SPI transfer gives up.
pub const SPI_TRANSFER_SPIN_LIMIT: u32 = 100_000;
