//! Volatile register access for memory-mapped USART and SPI blocks.

use core::ptr;

use serialcore_hal::{SpiRegisters, UsartRegisters};

const USART_SR: usize = 0x00;
const USART_DR: usize = 0x04;
const USART_BRR: usize = 0x08;
const USART_CR1: usize = 0x0C;
const USART_CR2: usize = 0x10;

const SPI_CR1: usize = 0x00;
const SPI_SR: usize = 0x08;
const SPI_DR: usize = 0x0C;

/// A USART register block at a fixed address.
pub struct UsartMmio {
    base: usize,
}

impl UsartMmio {
    /// Create a handle to the block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of a USART register block that stays mapped
    /// for the whole program.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` guarantees `base + offset` is a mapped register.
        unsafe { ptr::read_volatile((self.base + offset) as *const u32) }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: `new` guarantees `base + offset` is a mapped register.
        unsafe { ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

impl UsartRegisters for UsartMmio {
    fn read_sr(&self) -> u32 {
        self.read(USART_SR)
    }

    fn read_dr(&self) -> u32 {
        self.read(USART_DR)
    }

    fn write_dr(&self, value: u32) {
        self.write(USART_DR, value)
    }

    fn write_brr(&self, value: u32) {
        self.write(USART_BRR, value)
    }

    fn read_cr1(&self) -> u32 {
        self.read(USART_CR1)
    }

    fn write_cr1(&self, value: u32) {
        self.write(USART_CR1, value)
    }

    fn read_cr2(&self) -> u32 {
        self.read(USART_CR2)
    }

    fn write_cr2(&self, value: u32) {
        self.write(USART_CR2, value)
    }
}

/// An SPI register block at a fixed address.
pub struct SpiMmio {
    base: usize,
}

impl SpiMmio {
    /// Create a handle to the block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of an SPI register block that stays mapped
    /// for the whole program.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` guarantees `base + offset` is a mapped register.
        unsafe { ptr::read_volatile((self.base + offset) as *const u32) }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: `new` guarantees `base + offset` is a mapped register.
        unsafe { ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

impl SpiRegisters for SpiMmio {
    fn read_sr(&self) -> u32 {
        self.read(SPI_SR)
    }

    fn read_dr(&self) -> u32 {
        self.read(SPI_DR)
    }

    fn write_dr(&self, value: u32) {
        self.write(SPI_DR, value)
    }

    fn read_cr1(&self) -> u32 {
        self.read(SPI_CR1)
    }

    fn write_cr1(&self, value: u32) {
        self.write(SPI_CR1, value)
    }
}
