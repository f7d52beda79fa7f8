//! Fixed-capacity byte FIFO shared between one producer and one consumer.
//!
//! One slot always stays empty, so a buffer of `N` bytes holds at most `N - 1`.
//! Empty is `write == read`; full is `write + 1 == read` (mod `N`).

use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicUsize, Ordering},
};

/// A single-producer/single-consumer circular byte buffer.
///
/// The producer only ever advances the write index and the consumer only ever
/// advances the read index, so neither side needs a lock. Each side reads the
/// other's index with a single atomic load.
///
/// `N` must be a power of two; this is checked at compile time.
///
/// # Example
///
/// ```
/// use serialcore::sync::RingBuffer;
///
/// let buf = RingBuffer::<8>::new();
/// assert!(buf.store(b'a'));
/// assert_eq!(buf.peek(), Some(b'a'));
/// assert_eq!(buf.read(), Some(b'a'));
/// assert_eq!(buf.read(), None);
/// ```
pub struct RingBuffer<const N: usize> {
    /// Byte storage.
    data: UnsafeCell<[u8; N]>,
    /// Next slot to write. Owned by the producer.
    write: AtomicUsize,
    /// Next slot to read. Owned by the consumer.
    read: AtomicUsize,
    /// Bytes rejected because the buffer was full.
    dropped: AtomicUsize,
}

// Safety: The producer only writes slots in [write, read - 1) and the consumer
// only reads slots in [read, write). Index hand-off uses Release/Acquire, so a
// slot is never accessed from both sides at once.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = {
        assert!(N.is_power_of_two() && N >= 2, "ring buffer size must be a power of two");
        N - 1
    };

    /// Create a new empty buffer.
    pub const fn new() -> Self {
        let _ = Self::MASK;
        Self {
            data: UnsafeCell::new([0; N]),
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Total slots, including the one that is always kept free.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Append one byte. Producer side.
    ///
    /// Returns `false` and drops the byte if the buffer is full; queued data
    /// is left untouched.
    pub fn store(&self, byte: u8) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let next = (write + 1) & Self::MASK;
        if next == self.read.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // Safety: `write` is a free slot; the consumer won't touch it until
        // the Release store below publishes it.
        unsafe { (*self.data.get())[write] = byte };
        self.write.store(next, Ordering::Release);
        true
    }

    /// Remove and return the oldest byte. Consumer side.
    pub fn read(&self) -> Option<u8> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        // Safety: `read` was published by the producer and won't be reused
        // until the Release store below hands it back.
        let byte = unsafe { (*self.data.get())[read] };
        self.read.store((read + 1) & Self::MASK, Ordering::Release);
        Some(byte)
    }

    /// Return the oldest byte without removing it. Consumer side.
    pub fn peek(&self) -> Option<u8> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        // Safety: see `read`.
        Some(unsafe { (*self.data.get())[read] })
    }

    /// Number of bytes currently queued.
    pub fn available(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        write.wrapping_sub(read) & Self::MASK
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.write.load(Ordering::Acquire) == self.read.load(Ordering::Acquire)
    }

    /// Returns `true` if the next `store` would drop its byte.
    pub fn is_full(&self) -> bool {
        let write = self.write.load(Ordering::Acquire);
        ((write + 1) & Self::MASK) == self.read.load(Ordering::Acquire)
    }

    /// Bytes dropped by `store` since creation.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset both indices to zero, discarding queued data.
    ///
    /// Only valid while neither the producer nor the consumer can run, e.g.
    /// with the owning peripheral's interrupt masked.
    pub fn clear(&self) {
        self.read.store(0, Ordering::Release);
        self.write.store(0, Ordering::Release);
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
