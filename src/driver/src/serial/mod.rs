//! Interrupt-driven UART subsystem.
//!
//! - [`Descriptor`]: static description of one physical USART
//! - [`Uart`]: controller bound to a descriptor, owning its RX/TX buffers
//! - [`dispatch`]: process-wide table from peripheral to controller, used
//!   by the interrupt vectors
//!
//! # Example
//!
//! ```ignore
//! use serialcore::arch::stm32f4::{USART1, USART2};
//! use serialcore::serial::{dispatch::{self, VectorTable}, Uart};
//!
//! static SERIAL1: Uart = Uart::new(&USART1, &BOARD);
//! static SERIAL2: Uart = Uart::new(&USART2, &BOARD);
//!
//! dispatch::install(VectorTable::new().with(&SERIAL1).with(&SERIAL2))?;
//! SERIAL1.begin(115_200)?;
//! SERIAL1.write(b'!');
//! ```

mod boot_guard;
mod descriptor;
pub mod dispatch;
mod uart;

pub use boot_guard::BootGuard;
pub use descriptor::{Descriptor, PeripheralId};
pub use uart::{ByteCallback, PinAssignment, State, Uart, UartConfig};
