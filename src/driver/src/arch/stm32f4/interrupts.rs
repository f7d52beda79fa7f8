//! USART interrupt vectors.
//!
//! Each vector forwards to the dispatch table installed with
//! [`crate::serial::dispatch::install`]. The symbols only exist on bare-metal
//! ARM builds, where the startup code's vector table refers to them.

use crate::serial::{dispatch, PeripheralId};

/// Vector for USART1.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn USART1_IRQHandler() {
    on_usart(PeripheralId::Usart1);
}

/// Vector for USART2.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn USART2_IRQHandler() {
    on_usart(PeripheralId::Usart2);
}

/// Vector for USART3.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn USART3_IRQHandler() {
    on_usart(PeripheralId::Usart3);
}

/// Common body of every USART vector.
///
/// A vector that fires before the table is installed is ignored; the
/// peripheral's enable bits are only set by `begin`, which needs a controller.
#[inline]
pub fn on_usart(id: PeripheralId) {
    dispatch::dispatch(id);
}
