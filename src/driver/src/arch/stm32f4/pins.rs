//! Pin identifiers, encoded as `port * 16 + number`.

/// Encodes a pin from its port index (A = 0) and number.
pub const fn pin(port: u8, number: u8) -> u8 {
    port * 16 + number
}

/// Port of an encoded pin (A = 0).
pub const fn port_of(pin: u8) -> u8 {
    pin / 16
}

/// Number of an encoded pin within its port.
pub const fn number_of(pin: u8) -> u8 {
    pin % 16
}

#[allow(missing_docs)]
mod names {
    use super::pin;

    pub const PA5: u8 = pin(0, 5);
    pub const PA9: u8 = pin(0, 9);
    pub const PA10: u8 = pin(0, 10);
    pub const PB3: u8 = pin(1, 3);
    pub const PB4: u8 = pin(1, 4);
    pub const PB5: u8 = pin(1, 5);
    pub const PB6: u8 = pin(1, 6);
    pub const PB7: u8 = pin(1, 7);
    pub const PB8: u8 = pin(1, 8);
    pub const PB9: u8 = pin(1, 9);
}

pub use names::*;
