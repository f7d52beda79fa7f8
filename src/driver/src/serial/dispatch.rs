//! Process-wide map from interrupting peripheral to its controller.
//!
//! The table is built once at startup and installed with [`install`]; after
//! that it is read-only, so the interrupt vectors look it up without locking.

use conquer_once::spin::OnceCell;
use serialcore_common::UartError;

use super::{PeripheralId, Uart};

/// The installed table.
static TABLE: OnceCell<VectorTable> = OnceCell::uninit();

/// Fixed lookup from [`PeripheralId`] to controller.
#[derive(Clone, Copy)]
pub struct VectorTable {
    slots: [Option<&'static Uart>; PeripheralId::COUNT],
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorTable {
    /// Create a table with no controllers.
    pub const fn new() -> Self {
        Self {
            slots: [None; PeripheralId::COUNT],
        }
    }

    /// Register `uart` under its descriptor's peripheral, replacing any
    /// previous entry.
    pub fn with(mut self, uart: &'static Uart) -> Self {
        if let Some(slot) = self.slots.get_mut(uart.descriptor().id.index()) {
            *slot = Some(uart);
        }
        self
    }

    /// Controller registered for `id`.
    pub fn get(&self, id: PeripheralId) -> Option<&'static Uart> {
        self.slots.get(id.index()).copied().flatten()
    }

    /// Run the interrupt handler of the controller for `id`.
    ///
    /// Returns `false` if none is registered.
    pub fn dispatch(&self, id: PeripheralId) -> bool {
        match self.get(id) {
            Some(uart) => {
                uart.handle_interrupt();
                true
            }
            None => false,
        }
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no controller is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Install the process-wide table. Only the first call succeeds.
pub fn install(table: VectorTable) -> Result<(), UartError> {
    let registered = table.len();
    TABLE
        .try_init_once(|| table)
        .map_err(|_| UartError::TableAlreadyInstalled)?;
    log::info!("uart dispatch table installed ({} controllers)", registered);
    Ok(())
}

/// Controller registered for `id` in the installed table.
pub fn controller(id: PeripheralId) -> Result<&'static Uart, UartError> {
    TABLE
        .try_get()
        .ok()
        .and_then(|table| table.get(id))
        .ok_or(UartError::UnknownPeripheral)
}

/// Forward an interrupt for `id` to its controller. Called by the vectors.
///
/// Does nothing if the table is not installed yet or has no entry for `id`.
pub fn dispatch(id: PeripheralId) -> bool {
    // `try_get` never spins, unlike `get` during initialization.
    match TABLE.try_get() {
        Ok(table) => table.dispatch(id),
        Err(_) => false,
    }
}
