//! serialcore Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines traits that abstract away platform-specific hardware details:
//! register blocks, clock and pin routing, interrupt vectors and time.

#![no_std]

/// Trait for a serial port or similar character-based communication channel.
pub trait Serial {
    /// Writes a single byte to the serial port.
    fn write_byte(&mut self, byte: u8);
    /// Reads a single byte from the serial port, if available.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Raw access to one USART register block.
///
/// Implementations must behave like memory-mapped registers: every call is a
/// single volatile access, safe to issue from interrupt context.
pub trait UsartRegisters: Sync {
    /// Reads the status register.
    fn read_sr(&self) -> u32;
    /// Reads the data register. On real hardware this clears RX-not-empty.
    fn read_dr(&self) -> u32;
    /// Writes the data register.
    fn write_dr(&self, value: u32);
    /// Writes the baud-rate register.
    fn write_brr(&self, value: u32);
    /// Reads control register 1.
    fn read_cr1(&self) -> u32;
    /// Writes control register 1.
    fn write_cr1(&self, value: u32);
    /// Reads control register 2.
    fn read_cr2(&self) -> u32;
    /// Writes control register 2.
    fn write_cr2(&self, value: u32);
}

/// Raw access to one SPI register block.
pub trait SpiRegisters: Sync {
    /// Reads the status register.
    fn read_sr(&self) -> u32;
    /// Reads the data register.
    fn read_dr(&self) -> u32;
    /// Writes the data register.
    fn write_dr(&self, value: u32);
    /// Reads control register 1.
    fn read_cr1(&self) -> u32;
    /// Writes control register 1.
    fn write_cr1(&self, value: u32);
}

/// Peripheral bus a clock gate lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    /// Low-speed peripheral bus.
    Apb1,
    /// High-speed peripheral bus.
    Apb2,
}

/// Identifies the enable bit of one peripheral clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockGate {
    /// Bus the peripheral hangs off.
    pub bus: Bus,
    /// Bit index in the bus enable register.
    pub bit: u8,
}

/// Opaque "apply peripheral configuration" capability: clocks and pin muxing.
pub trait PeripheralConfig: Sync {
    /// Turns a peripheral clock on.
    fn enable_clock(&self, gate: ClockGate);
    /// Turns a peripheral clock off.
    fn disable_clock(&self, gate: ClockGate);
    /// Routes a pin to the given alternate function.
    fn set_alternate_function(&self, pin: u8, af: u8);
    /// Returns the clock frequency of a bus in Hz.
    fn bus_clock_hz(&self, bus: Bus) -> u32;
}

/// Trait for controlling interrupts.
pub trait InterruptController: Sync {
    /// Unmasks one interrupt vector.
    fn enable_irq(&self, irq: u16);
    /// Masks one interrupt vector.
    fn disable_irq(&self, irq: u16);
}

/// Trait for a system timer.
pub trait Timer: Sync {
    /// Returns the number of milliseconds since the system started.
    fn current_millis(&self) -> u64;
}

/// Everything a driver needs from the board it runs on.
pub trait Board: PeripheralConfig + InterruptController + Timer {}

impl<T: PeripheralConfig + InterruptController + Timer> Board for T {}
