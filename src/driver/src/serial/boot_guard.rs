//! Output suppression window for ports shared with a bootloader.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Blocks transmission for a fixed time after the port is activated.
///
/// Timestamps are kept as wrapping 32-bit milliseconds. Once the window has
/// been seen to elapse the guard latches open until it is re-armed, so a
/// counter wrap never closes it again.
#[derive(Debug)]
pub struct BootGuard {
    window_ms: u32,
    armed_at: AtomicU32,
    open: AtomicBool,
}

impl BootGuard {
    /// Create a disarmed guard with the given window.
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            armed_at: AtomicU32::new(0),
            open: AtomicBool::new(false),
        }
    }

    /// Length of the window in milliseconds.
    pub const fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Start a new window at `now_ms`.
    pub fn arm(&self, now_ms: u64) {
        self.armed_at.store(now_ms as u32, Ordering::Relaxed);
        self.open.store(false, Ordering::Relaxed);
    }

    /// Returns `true` while output must be suppressed.
    pub fn is_closed(&self, now_ms: u64) -> bool {
        if self.open.load(Ordering::Relaxed) {
            return false;
        }

        let elapsed = (now_ms as u32).wrapping_sub(self.armed_at.load(Ordering::Relaxed));
        if elapsed >= self.window_ms {
            self.open.store(true, Ordering::Relaxed);
            false
        } else {
            true
        }
    }
}
