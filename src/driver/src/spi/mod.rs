//! Synchronous bus-transfer peripheral (SPI master).
//!
//! No buffering and no interrupts on the data path: `transfer` shifts one
//! byte out and one byte in, polling the status flags. The caller drives
//! chip select.

use core::sync::atomic::{AtomicBool, Ordering};

use serialcore_common::{
    regs::{SpiCr1, SpiStatus, SPI_CR1_BR_SHIFT},
    BitOrder, ClockDivider, DataMode, SpiError,
};
use serialcore_hal::{Board, ClockGate, SpiRegisters};
use spin::Mutex;

use crate::config::SPI_TRANSFER_SPIN_LIMIT;

/// Clock and data pins with their alternate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiPins {
    /// Clock pin.
    pub sck: u8,
    /// Alternate function for `sck`.
    pub af_sck: u8,
    /// Master-in pin.
    pub miso: u8,
    /// Alternate function for `miso`.
    pub af_miso: u8,
    /// Master-out pin.
    pub mosi: u8,
    /// Alternate function for `mosi`.
    pub af_mosi: u8,
}

/// Everything that is fixed about one SPI block.
pub struct SpiDescriptor {
    /// The peripheral's register block.
    pub regs: &'static dyn SpiRegisters,
    /// Interrupt vector number (unused on the data path).
    pub irq: u16,
    /// Clock enable bit.
    pub clock: ClockGate,
    /// Default pins.
    pub pins: SpiPins,
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    pins: SpiPins,
    bit_order: BitOrder,
    data_mode: DataMode,
    divider: ClockDivider,
}

/// SPI master bound to one [`SpiDescriptor`].
pub struct Spi {
    descriptor: &'static SpiDescriptor,
    board: &'static dyn Board,
    settings: Mutex<Settings>,
    enabled: AtomicBool,
}

impl Spi {
    /// Create a disabled bus with default settings: MSB first, mode 0, /4.
    pub const fn new(descriptor: &'static SpiDescriptor, board: &'static dyn Board) -> Self {
        Self {
            descriptor,
            board,
            settings: Mutex::new(Settings {
                pins: descriptor.pins,
                bit_order: BitOrder::MsbFirst,
                data_mode: DataMode::Mode0,
                divider: ClockDivider::Div4,
            }),
            enabled: AtomicBool::new(false),
        }
    }

    /// Override the default pins. Takes effect on the next `begin`.
    pub fn set_pins(&self, sck: u8, af_sck: u8, miso: u8, af_miso: u8, mosi: u8, af_mosi: u8) {
        self.settings.lock().pins = SpiPins {
            sck,
            af_sck,
            miso,
            af_miso,
            mosi,
            af_mosi,
        };
        log::debug!("spi: pins sck={} miso={} mosi={}", sck, miso, mosi);
    }

    /// Pins the next `begin` will route.
    pub fn pins(&self) -> SpiPins {
        self.settings.lock().pins
    }

    /// Start the peripheral and route its pins.
    pub fn begin(&self) {
        let d = self.descriptor;
        let settings = *self.settings.lock();

        self.board.enable_clock(d.clock);
        self.board.set_alternate_function(settings.pins.sck, settings.pins.af_sck);
        self.board.set_alternate_function(settings.pins.miso, settings.pins.af_miso);
        self.board.set_alternate_function(settings.pins.mosi, settings.pins.af_mosi);

        d.regs.write_cr1(0);
        d.regs.write_cr1((control_bits(&settings) | SpiCr1::SPE).bits());
        self.enabled.store(true, Ordering::Release);
        log::debug!(
            "spi: enabled, {:?} {:?} /{}",
            settings.data_mode,
            settings.bit_order,
            settings.divider.divisor()
        );
    }

    /// Stop the peripheral once the last frame has finished.
    pub fn end(&self) {
        if !self.enabled.swap(false, Ordering::AcqRel) {
            return;
        }

        let d = self.descriptor;
        if self.wait_for(|sr| !sr.contains(SpiStatus::BSY)).is_err() {
            log::warn!("spi: still busy at end, disabling anyway");
        }
        let cr1 = SpiCr1::from_bits_truncate(d.regs.read_cr1());
        d.regs.write_cr1((cr1 - SpiCr1::SPE).bits());
        self.board.disable_clock(d.clock);
        log::debug!("spi: disabled");
    }

    /// Set the bit order.
    pub fn set_bit_order(&self, order: BitOrder) {
        self.update(|s| s.bit_order = order);
    }

    /// Set clock polarity and phase.
    pub fn set_data_mode(&self, mode: DataMode) {
        self.update(|s| s.data_mode = mode);
    }

    /// Set the serial clock divider.
    pub fn set_clock_divider(&self, divider: ClockDivider) {
        self.update(|s| s.divider = divider);
    }

    /// Exchange one byte: send `byte`, return what the slave sent back.
    pub fn transfer(&self, byte: u8) -> Result<u8, SpiError> {
        if !self.is_enabled() {
            return Err(SpiError::NotEnabled);
        }

        let regs = self.descriptor.regs;
        self.wait_for(|sr| sr.contains(SpiStatus::TXE))?;
        regs.write_dr(u32::from(byte));
        self.wait_for(|sr| sr.contains(SpiStatus::RXNE))?;
        Ok(regs.read_dr() as u8)
    }

    /// No-op; slave-mode interrupts are not used.
    pub fn attach_interrupt(&self) {
        log::trace!("spi: attach_interrupt ignored");
    }

    /// No-op; slave-mode interrupts are not used.
    pub fn detach_interrupt(&self) {
        log::trace!("spi: detach_interrupt ignored");
    }

    /// Returns `true` between `begin` and `end`.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn update(&self, f: impl FnOnce(&mut Settings)) {
        let settings = {
            let mut guard = self.settings.lock();
            f(&mut guard);
            *guard
        };

        if self.is_enabled() {
            let regs = self.descriptor.regs;
            let cr1 = SpiCr1::from_bits_truncate(regs.read_cr1());
            // CPOL/CPHA/BR/LSBFIRST may only change with SPE clear.
            regs.write_cr1((cr1 - SpiCr1::SPE).bits());
            regs.write_cr1((control_bits(&settings) | SpiCr1::SPE).bits());
        }
        log::trace!(
            "spi: {:?} {:?} /{}",
            settings.data_mode,
            settings.bit_order,
            settings.divider.divisor()
        );
    }

    fn wait_for(&self, ready: impl Fn(SpiStatus) -> bool) -> Result<(), SpiError> {
        let regs = self.descriptor.regs;
        for _ in 0..SPI_TRANSFER_SPIN_LIMIT {
            if ready(SpiStatus::from_bits_truncate(regs.read_sr())) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(SpiError::Timeout)
    }
}

/// CR1 for master mode with software slave select, without SPE.
fn control_bits(settings: &Settings) -> SpiCr1 {
    let mut cr1 = SpiCr1::MSTR | SpiCr1::SSM | SpiCr1::SSI;
    cr1 |= SpiCr1::from_bits_truncate(settings.divider.prescaler_bits() << SPI_CR1_BR_SHIFT);
    if settings.data_mode.cpol() {
        cr1 |= SpiCr1::CPOL;
    }
    if settings.data_mode.cpha() {
        cr1 |= SpiCr1::CPHA;
    }
    if settings.bit_order == BitOrder::LsbFirst {
        cr1 |= SpiCr1::LSBFIRST;
    }
    cr1
}
