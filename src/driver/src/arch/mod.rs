//! Board-specific register maps and peripheral tables.
//!
//! Currently supported: STM32F4.

pub mod stm32f4;
