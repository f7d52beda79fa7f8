//! Test infrastructure for serialcore.
//!
//! Register-level fakes that let the driver run on the host. None of these
//! allocate; tests typically `Box::leak` them to get the `'static` references
//! descriptors and controllers expect.
//!
//! # Usage
//!
//! ```rust,ignore
//! use serialcore::testutil::{FakeBoard, FakeUsart};
//!
//! let regs: &'static FakeUsart = Box::leak(Box::new(FakeUsart::new()));
//! regs.inject(b'x');
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};

use serialcore_common::regs::{SpiStatus, UsartCr1, UsartStatus};
use serialcore_hal::{
    Bus, ClockGate, InterruptController, PeripheralConfig, SpiRegisters, Timer, UsartRegisters,
};

use crate::sync::RingBuffer;

/// Simulated USART register block.
///
/// Writes to DR move straight onto the wire, so TXE and TC stay set. Bytes
/// queued with [`inject`](FakeUsart::inject) raise RXNE until read.
pub struct FakeUsart {
    sr: AtomicU32,
    cr1: AtomicU32,
    cr2: AtomicU32,
    brr: AtomicU32,
    wire: RingBuffer<256>,
    incoming: RingBuffer<256>,
}

impl Default for FakeUsart {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeUsart {
    /// Create an idle block with an empty transmitter.
    pub const fn new() -> Self {
        Self {
            sr: AtomicU32::new(UsartStatus::TXE.bits() | UsartStatus::TC.bits()),
            cr1: AtomicU32::new(0),
            cr2: AtomicU32::new(0),
            brr: AtomicU32::new(0),
            wire: RingBuffer::new(),
            incoming: RingBuffer::new(),
        }
    }

    /// Deliver a byte from the line, raising RXNE.
    pub fn inject(&self, byte: u8) {
        self.incoming.store(byte);
        self.set_status(UsartStatus::RXNE);
    }

    /// Raise status bits, e.g. line errors.
    pub fn set_status(&self, flags: UsartStatus) {
        self.sr.fetch_or(flags.bits(), Ordering::SeqCst);
    }

    /// Clear status bits, e.g. TC to simulate a frame still shifting out.
    pub fn clear_status(&self, flags: UsartStatus) {
        self.sr.fetch_and(!flags.bits(), Ordering::SeqCst);
    }

    /// Next byte the driver transmitted.
    pub fn transmitted(&self) -> Option<u8> {
        self.wire.read()
    }

    /// Current CR1 contents.
    pub fn cr1(&self) -> UsartCr1 {
        UsartCr1::from_bits_truncate(self.cr1.load(Ordering::SeqCst))
    }

    /// Current CR2 contents.
    pub fn cr2(&self) -> u32 {
        self.cr2.load(Ordering::SeqCst)
    }

    /// Current baud-rate register.
    pub fn brr(&self) -> u32 {
        self.brr.load(Ordering::SeqCst)
    }

    /// Returns `true` if the TX-empty interrupt is enabled.
    pub fn tx_interrupt_enabled(&self) -> bool {
        self.cr1().contains(UsartCr1::TXEIE)
    }

    /// Returns `true` if the RX-not-empty interrupt is enabled.
    pub fn rx_interrupt_enabled(&self) -> bool {
        self.cr1().contains(UsartCr1::RXNEIE)
    }

    /// Returns `true` if an enabled interrupt source is pending.
    pub fn interrupt_pending(&self) -> bool {
        let sr = UsartStatus::from_bits_truncate(self.sr.load(Ordering::SeqCst));
        let cr1 = self.cr1();
        (cr1.contains(UsartCr1::RXNEIE) && sr.contains(UsartStatus::RXNE))
            || (cr1.contains(UsartCr1::TXEIE) && sr.contains(UsartStatus::TXE))
    }
}

impl UsartRegisters for FakeUsart {
    fn read_sr(&self) -> u32 {
        self.sr.load(Ordering::SeqCst)
    }

    fn read_dr(&self) -> u32 {
        let byte = self.incoming.read().unwrap_or(0);
        // DR read after SR read clears the error flags
        self.clear_status(UsartStatus::PE | UsartStatus::FE | UsartStatus::NF | UsartStatus::ORE);
        if self.incoming.is_empty() {
            self.clear_status(UsartStatus::RXNE);
        }
        u32::from(byte)
    }

    fn write_dr(&self, value: u32) {
        self.wire.store(value as u8);
    }

    fn write_brr(&self, value: u32) {
        self.brr.store(value, Ordering::SeqCst);
    }

    fn read_cr1(&self) -> u32 {
        self.cr1.load(Ordering::SeqCst)
    }

    fn write_cr1(&self, value: u32) {
        self.cr1.store(value, Ordering::SeqCst);
    }

    fn read_cr2(&self) -> u32 {
        self.cr2.load(Ordering::SeqCst)
    }

    fn write_cr2(&self, value: u32) {
        self.cr2.store(value, Ordering::SeqCst);
    }
}

/// Simulated SPI register block.
///
/// Echoes every byte written unless responses were queued with
/// [`respond`](FakeSpi::respond).
pub struct FakeSpi {
    sr: AtomicU32,
    cr1: AtomicU32,
    rx: AtomicU32,
    responses: RingBuffer<64>,
    sent: RingBuffer<64>,
    stalled: AtomicBool,
}

impl Default for FakeSpi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSpi {
    /// Create an idle block.
    pub const fn new() -> Self {
        Self {
            sr: AtomicU32::new(SpiStatus::TXE.bits()),
            cr1: AtomicU32::new(0),
            rx: AtomicU32::new(0),
            responses: RingBuffer::new(),
            sent: RingBuffer::new(),
            stalled: AtomicBool::new(false),
        }
    }

    /// Queue the byte the slave answers with on the next transfer.
    pub fn respond(&self, byte: u8) {
        self.responses.store(byte);
    }

    /// Next byte the driver shifted out.
    pub fn sent(&self) -> Option<u8> {
        self.sent.read()
    }

    /// Keep TXE low forever, so transfers time out.
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
        self.sr.fetch_and(!SpiStatus::TXE.bits(), Ordering::SeqCst);
    }

    /// Current CR1 contents.
    pub fn cr1(&self) -> u32 {
        self.cr1.load(Ordering::SeqCst)
    }
}

impl SpiRegisters for FakeSpi {
    fn read_sr(&self) -> u32 {
        self.sr.load(Ordering::SeqCst)
    }

    fn read_dr(&self) -> u32 {
        self.sr.fetch_and(!SpiStatus::RXNE.bits(), Ordering::SeqCst);
        self.rx.load(Ordering::SeqCst)
    }

    fn write_dr(&self, value: u32) {
        if self.stalled.load(Ordering::SeqCst) {
            return;
        }
        let byte = value as u8;
        self.sent.store(byte);
        let reply = self.responses.read().unwrap_or(byte);
        self.rx.store(u32::from(reply), Ordering::SeqCst);
        self.sr.fetch_or(SpiStatus::RXNE.bits(), Ordering::SeqCst);
    }

    fn read_cr1(&self) -> u32 {
        self.cr1.load(Ordering::SeqCst)
    }

    fn write_cr1(&self, value: u32) {
        self.cr1.store(value, Ordering::SeqCst);
    }
}

/// Number of pins tracked by [`FakeBoard`].
pub const FAKE_PIN_COUNT: usize = 128;

#[allow(clippy::declare_interior_mutable_const)]
const PIN_UNROUTED: AtomicU8 = AtomicU8::new(u8::MAX);

/// Simulated board: clocks, pin muxing, interrupt masks and a settable clock.
pub struct FakeBoard {
    millis: AtomicU64,
    apb1_clocks: AtomicU32,
    apb2_clocks: AtomicU32,
    irqs: AtomicU64,
    pins: [AtomicU8; FAKE_PIN_COUNT],
}

impl Default for FakeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBoard {
    /// Low-speed bus clock in Hz.
    pub const APB1_HZ: u32 = 42_000_000;
    /// High-speed bus clock in Hz.
    pub const APB2_HZ: u32 = 84_000_000;

    /// Create a board at time zero with everything off.
    pub const fn new() -> Self {
        Self {
            millis: AtomicU64::new(0),
            apb1_clocks: AtomicU32::new(0),
            apb2_clocks: AtomicU32::new(0),
            irqs: AtomicU64::new(0),
            pins: [PIN_UNROUTED; FAKE_PIN_COUNT],
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, ms: u64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }

    /// Returns `true` if the gate's clock is on.
    pub fn clock_enabled(&self, gate: ClockGate) -> bool {
        self.clocks(gate.bus).load(Ordering::SeqCst) & (1 << gate.bit) != 0
    }

    /// Returns `true` if the vector is unmasked.
    pub fn irq_enabled(&self, irq: u16) -> bool {
        self.irqs.load(Ordering::SeqCst) & irq_bit(irq) != 0
    }

    /// Alternate function last routed to `pin`.
    pub fn alternate_function(&self, pin: u8) -> Option<u8> {
        match self.pins.get(usize::from(pin)) {
            Some(af) => match af.load(Ordering::SeqCst) {
                u8::MAX => None,
                af => Some(af),
            },
            None => None,
        }
    }

    fn clocks(&self, bus: Bus) -> &AtomicU32 {
        match bus {
            Bus::Apb1 => &self.apb1_clocks,
            Bus::Apb2 => &self.apb2_clocks,
        }
    }
}

fn irq_bit(irq: u16) -> u64 {
    1u64.checked_shl(u32::from(irq)).unwrap_or(0)
}

impl PeripheralConfig for FakeBoard {
    fn enable_clock(&self, gate: ClockGate) {
        self.clocks(gate.bus).fetch_or(1 << gate.bit, Ordering::SeqCst);
    }

    fn disable_clock(&self, gate: ClockGate) {
        self.clocks(gate.bus).fetch_and(!(1 << gate.bit), Ordering::SeqCst);
    }

    fn set_alternate_function(&self, pin: u8, af: u8) {
        if let Some(slot) = self.pins.get(usize::from(pin)) {
            slot.store(af, Ordering::SeqCst);
        }
    }

    fn bus_clock_hz(&self, bus: Bus) -> u32 {
        match bus {
            Bus::Apb1 => Self::APB1_HZ,
            Bus::Apb2 => Self::APB2_HZ,
        }
    }
}

impl InterruptController for FakeBoard {
    fn enable_irq(&self, irq: u16) {
        self.irqs.fetch_or(irq_bit(irq), Ordering::SeqCst);
    }

    fn disable_irq(&self, irq: u16) {
        self.irqs.fetch_and(!irq_bit(irq), Ordering::SeqCst);
    }
}

impl Timer for FakeBoard {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}
