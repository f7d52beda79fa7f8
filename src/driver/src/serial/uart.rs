//! UART controller: lifecycle, buffered I/O and interrupt servicing.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use serialcore_common::{
    mode::{DataBits, Parity, SerialMode, StopBits},
    regs::{LineErrors, UsartCr1, UsartStatus, USART_CR2_STOP_2, USART_CR2_STOP_MASK},
    UartError,
};
use serialcore_hal::{Board, Serial};
use spin::Mutex;

use super::{BootGuard, Descriptor};
use crate::config::{BOOT_GUARD_MS, DEFAULT_MODE, RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use crate::sync::RingBuffer;

/// Receives bytes in interrupt context while attached.
pub type ByteCallback = fn(u8);

/// Smallest divisor the baud-rate register accepts.
const MIN_DIVISOR: u32 = 16;
/// Largest divisor the baud-rate register accepts.
const MAX_DIVISOR: u32 = 0xFFFF;

/// Lifecycle state of a [`Uart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    /// Constructed or ended; interrupts off.
    Idle = 0,
    /// Inside `begin`.
    Configuring = 1,
    /// Interrupts on, I/O permitted.
    Active = 2,
}

impl State {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => State::Configuring,
            2 => State::Active,
            _ => State::Idle,
        }
    }
}

/// Pins a controller routes on `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignment {
    /// Transmit pin.
    pub tx: u8,
    /// Receive pin.
    pub rx: u8,
}

/// Line settings applied by the last successful `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate in bits per second.
    pub baud: u32,
    /// Frame format.
    pub mode: SerialMode,
}

/// Controller for one USART.
///
/// Bound to its [`Descriptor`] for life and shared between the main context
/// and the peripheral's interrupt vector, so every method takes `&self`.
///
/// The RX buffer is filled by [`handle_interrupt`](Uart::handle_interrupt)
/// and drained by `read`; the TX buffer is filled by `write` and drained by
/// `handle_interrupt`. Neither needs a lock.
pub struct Uart {
    descriptor: &'static Descriptor,
    board: &'static dyn Board,
    rx: RingBuffer<RX_BUFFER_SIZE>,
    tx: RingBuffer<TX_BUFFER_SIZE>,
    state: AtomicU8,
    /// Applied to every received byte; strips parity on 7-bit frames.
    rx_mask: AtomicU8,
    line_errors: AtomicU32,
    pins: Mutex<PinAssignment>,
    config: Mutex<Option<UartConfig>>,
    /// Only touched by the ISR via `try_lock`, and only while RXNEIE is set.
    callback: Mutex<Option<ByteCallback>>,
    boot_guard: Option<BootGuard>,
}

impl Uart {
    /// Create an idle controller for `descriptor`.
    ///
    /// Ports flagged as bootloader-sharing get a boot guard.
    pub const fn new(descriptor: &'static Descriptor, board: &'static dyn Board) -> Self {
        let boot_guard = if descriptor.shares_bootloader {
            Some(BootGuard::new(BOOT_GUARD_MS))
        } else {
            None
        };

        Self {
            descriptor,
            board,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            state: AtomicU8::new(State::Idle as u8),
            rx_mask: AtomicU8::new(0xFF),
            line_errors: AtomicU32::new(0),
            pins: Mutex::new(PinAssignment {
                tx: descriptor.tx_pin,
                rx: descriptor.rx_pin,
            }),
            config: Mutex::new(None),
            callback: Mutex::new(None),
            boot_guard,
        }
    }

    /// The peripheral this controller drives.
    pub fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        State::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Returns `true` between `begin` and `end`.
    pub fn is_active(&self) -> bool {
        self.state() == State::Active
    }

    /// Always `true`; a constructed controller has no "absent" state.
    pub const fn is_usable(&self) -> bool {
        true
    }

    /// Settings of the last successful `begin`, if any.
    pub fn config(&self) -> Option<UartConfig> {
        *self.config.lock()
    }

    /// Pins that the next `begin` will route.
    pub fn pins(&self) -> PinAssignment {
        *self.pins.lock()
    }

    /// Override the descriptor's default pins.
    ///
    /// Must be called before `begin`. While active the new pins are only
    /// recorded; they take effect on the next `begin`.
    pub fn set_pins(&self, tx: u8, rx: u8) {
        if self.is_active() {
            log::warn!(
                "{:?}: set_pins({}, {}) while active, applies on next begin",
                self.descriptor.id,
                tx,
                rx
            );
        } else {
            log::debug!("{:?}: pins tx={} rx={}", self.descriptor.id, tx, rx);
        }
        *self.pins.lock() = PinAssignment { tx, rx };
    }

    /// Activate with the default 8N1 frame.
    pub fn begin(&self, baud: u32) -> Result<(), UartError> {
        self.begin_with_mode(baud, DEFAULT_MODE)
    }

    /// Activate with a raw `SERIAL_*` mode byte.
    pub fn begin_raw(&self, baud: u32, mode: u8) -> Result<(), UartError> {
        let mode = SerialMode::from_bits(mode)?;
        self.begin_with_mode(baud, mode)
    }

    /// Activate the peripheral.
    ///
    /// Routes pins, programs the frame and baud rate, clears both buffers and
    /// enables the receive interrupt. The transmit interrupt stays off until
    /// the first `write`. Calling this while active re-applies everything.
    ///
    /// On error the controller is left untouched.
    pub fn begin_with_mode(&self, baud: u32, mode: SerialMode) -> Result<(), UartError> {
        let d = self.descriptor;
        let divisor = baud_divisor(self.board.bus_clock_hz(d.clock.bus), baud)?;

        self.state.store(State::Configuring as u8, Ordering::Release);
        self.board.enable_clock(d.clock);
        self.quiesce();

        let pins = self.pins();
        self.board.set_alternate_function(pins.tx, d.af);
        self.board.set_alternate_function(pins.rx, d.af);

        let regs = d.regs;
        regs.write_cr1(0);
        regs.write_brr(divisor);
        let mut cr2 = regs.read_cr2() & !USART_CR2_STOP_MASK;
        if mode.stop_bits() == StopBits::Two {
            cr2 |= USART_CR2_STOP_2;
        }
        regs.write_cr2(cr2);

        self.rx.clear();
        self.tx.clear();
        self.rx_mask.store(mode.data_mask(), Ordering::Relaxed);
        self.line_errors.store(0, Ordering::Relaxed);
        *self.config.lock() = Some(UartConfig { baud, mode });
        if let Some(guard) = &self.boot_guard {
            guard.arm(self.board.current_millis());
        }

        let cr1 = frame_bits(mode) | UsartCr1::UE | UsartCr1::TE | UsartCr1::RE | UsartCr1::RXNEIE;
        regs.write_cr1(cr1.bits());
        self.board.enable_irq(d.irq);
        self.state.store(State::Active as u8, Ordering::Release);

        log::info!(
            "{:?}: {} baud, mode {:#04x}, pins tx={} rx={}",
            d.id,
            baud,
            mode.bits(),
            pins.tx,
            pins.rx
        );
        Ok(())
    }

    /// Deactivate the peripheral. Queued data in both directions is lost.
    pub fn end(&self) {
        if self.state() == State::Idle {
            return;
        }

        let d = self.descriptor;
        self.quiesce();
        d.regs.write_cr1(0);
        self.board.disable_clock(d.clock);
        self.rx.clear();
        self.tx.clear();
        self.state.store(State::Idle as u8, Ordering::Release);
        log::debug!("{:?}: ended", d.id);
    }

    /// Bytes waiting in the RX buffer.
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Oldest received byte, left in place.
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Oldest received byte.
    pub fn read(&self) -> Option<u8> {
        self.rx.read()
    }

    /// Busy-wait until everything queued has left the wire.
    ///
    /// Returns immediately when not active, since nothing would drain the
    /// buffer.
    pub fn flush(&self) {
        if !self.is_active() {
            return;
        }
        while !self.write_complete() {
            core::hint::spin_loop();
        }
    }

    /// Returns `true` if `flush` would return immediately.
    pub fn write_complete(&self) -> bool {
        if !self.tx.is_empty() {
            return false;
        }
        !self.is_active()
            || UsartStatus::from_bits_truncate(self.descriptor.regs.read_sr())
                .contains(UsartStatus::TC)
    }

    /// Queue one byte for transmission.
    ///
    /// Returns 1 if queued, or 0 if it was dropped: TX buffer full, not
    /// active, or inside the boot-guard window.
    pub fn write(&self, byte: u8) -> usize {
        if !self.is_active() || self.in_boot_guard() {
            return 0;
        }

        // Queue before unmasking, or the ISR could see an empty buffer and
        // switch itself off again.
        let stored = self.tx.store(byte);
        self.enable_tx_interrupt();
        usize::from(stored)
    }

    /// Returns `true` while the boot guard suppresses output.
    pub fn in_boot_guard(&self) -> bool {
        match &self.boot_guard {
            Some(guard) => guard.is_closed(self.board.current_millis()),
            None => false,
        }
    }

    /// Hand received bytes to `callback` instead of the RX buffer.
    pub fn attach_interrupt(&self, callback: ByteCallback) {
        self.with_rx_masked(|| *self.callback.lock() = Some(callback));
        log::debug!("{:?}: rx callback attached", self.descriptor.id);
    }

    /// Return to buffered receive. Idempotent.
    pub fn detach_interrupt(&self) {
        self.with_rx_masked(|| *self.callback.lock() = None);
        log::debug!("{:?}: rx callback detached", self.descriptor.id);
    }

    /// Received bytes lost to a full RX buffer.
    pub fn rx_dropped(&self) -> usize {
        self.rx.dropped()
    }

    /// Line errors seen since the last call (or `begin`), then clears them.
    pub fn take_line_errors(&self) -> LineErrors {
        LineErrors::from_bits_truncate(self.line_errors.swap(0, Ordering::Relaxed))
    }

    /// Service the peripheral's combined RX/TX interrupt.
    ///
    /// Called from the vector through the dispatch table. Handles every
    /// pending event in one pass, never blocks and never allocates.
    pub fn handle_interrupt(&self) {
        let regs = self.descriptor.regs;
        let status = UsartStatus::from_bits_truncate(regs.read_sr());
        let cr1 = UsartCr1::from_bits_truncate(regs.read_cr1());

        let errors = LineErrors::from(status);
        if !errors.is_empty() {
            self.line_errors.fetch_or(errors.bits(), Ordering::Relaxed);
        }

        if cr1.contains(UsartCr1::RXNEIE)
            && status.intersects(UsartStatus::RXNE | UsartStatus::ORE)
        {
            // Reading DR clears RXNE and, after the SR read above, the error flags.
            let byte = (regs.read_dr() as u8) & self.rx_mask.load(Ordering::Relaxed);
            self.receive(byte);
        }

        if cr1.contains(UsartCr1::TXEIE) && status.contains(UsartStatus::TXE) {
            if let Some(byte) = self.tx.read() {
                regs.write_dr(u32::from(byte));
            }
            if self.tx.is_empty() {
                regs.write_cr1((cr1 - UsartCr1::TXEIE).bits());
            }
        }
    }

    fn receive(&self, byte: u8) {
        let callback = match self.callback.try_lock() {
            Some(slot) => *slot,
            None => None,
        };
        match callback {
            Some(callback) => callback(byte),
            None => {
                self.rx.store(byte);
            }
        }
    }

    fn enable_tx_interrupt(&self) {
        let regs = self.descriptor.regs;
        let cr1 = UsartCr1::from_bits_truncate(regs.read_cr1());
        if !cr1.contains(UsartCr1::TXEIE) {
            regs.write_cr1((cr1 | UsartCr1::TXEIE).bits());
        }
    }

    /// Mask the vector and both interrupt sources. Must precede any change to
    /// state the ISR reads.
    fn quiesce(&self) {
        let regs = self.descriptor.regs;
        self.board.disable_irq(self.descriptor.irq);
        let cr1 = UsartCr1::from_bits_truncate(regs.read_cr1());
        regs.write_cr1((cr1 - (UsartCr1::RXNEIE | UsartCr1::TXEIE)).bits());
    }

    fn with_rx_masked(&self, f: impl FnOnce()) {
        if !self.is_active() {
            f();
            return;
        }

        let regs = self.descriptor.regs;
        let cr1 = UsartCr1::from_bits_truncate(regs.read_cr1());
        regs.write_cr1((cr1 - UsartCr1::RXNEIE).bits());
        f();
        let cr1 = UsartCr1::from_bits_truncate(regs.read_cr1());
        regs.write_cr1((cr1 | UsartCr1::RXNEIE).bits());
    }
}

impl Serial for &Uart {
    fn write_byte(&mut self, byte: u8) {
        Uart::write(*self, byte);
    }

    fn read_byte(&mut self) -> Option<u8> {
        Uart::read(*self)
    }
}

/// Baud-rate register value for 16x oversampling, rounded to nearest.
fn baud_divisor(bus_hz: u32, baud: u32) -> Result<u32, UartError> {
    if baud == 0 {
        return Err(UartError::InvalidBaud(baud));
    }

    let divisor = (u64::from(bus_hz) + u64::from(baud / 2)) / u64::from(baud);
    if divisor < u64::from(MIN_DIVISOR) || divisor > u64::from(MAX_DIVISOR) {
        return Err(UartError::InvalidBaud(baud));
    }
    Ok(divisor as u32)
}

/// CR1 word-length and parity bits. The word length counts the parity bit.
fn frame_bits(mode: SerialMode) -> UsartCr1 {
    let mut cr1 = UsartCr1::empty();
    match mode.parity() {
        Parity::None => {}
        Parity::Even => cr1 |= UsartCr1::PCE,
        Parity::Odd => cr1 |= UsartCr1::PCE | UsartCr1::PS,
    }
    if mode.data_bits() == DataBits::Eight && mode.parity() != Parity::None {
        cr1 |= UsartCr1::M;
    }
    cr1
}
