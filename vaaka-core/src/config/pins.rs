//! Pin assignment
//!
//! Pins are written as `gpioN` with optional modifiers in front:
//! `!` marks an active-low pin, `^` enables the internal pull-up.
//! `"!^gpio10"` is an active-low input with pull-up on GPIO10.

use core::fmt;
use core::str::FromStr;

use crate::fault::ConfigError;

/// Highest GPIO number on the board
pub const MAX_GPIO: u8 = 29;

/// Lift servo PWM output (slice 0, channel A)
pub const LIFT_PWM_PIN: u8 = 0;

/// Telemetry UART transmit (UART1 TX)
pub const TELEMETRY_TX_PIN: u8 = 4;

/// Force sensor ADC input (ADC0)
pub const FORCE_ADC_PIN: u8 = 26;

/// Accelerometer X axis ADC input (ADC1)
pub const ACCEL_X_ADC_PIN: u8 = 27;

/// Accelerometer Y axis ADC input (ADC2)
pub const ACCEL_Y_ADC_PIN: u8 = 28;

/// Pins with a board-fixed function that cannot be assigned in config
pub const RESERVED_PINS: [u8; 5] = [
    LIFT_PWM_PIN,
    TELEMETRY_TX_PIN,
    FORCE_ADC_PIN,
    ACCEL_X_ADC_PIN,
    ACCEL_Y_ADC_PIN,
];

/// A single GPIO with polarity and pull configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSpec {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinSpec {
    /// Active-high pin without pull
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Active-low input with pull-up (buttons, open-collector sensors)
    pub const fn active_low_pull_up(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// Apply polarity to a physical level
    pub fn logical(&self, high: bool) -> bool {
        high != self.inverted
    }
}

impl FromStr for PinSpec {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut s = value.trim().trim_matches('"');
        let mut inverted = false;
        let mut pull_up = false;

        loop {
            if let Some(rest) = s.strip_prefix('!') {
                inverted = true;
                s = rest;
            } else if let Some(rest) = s.strip_prefix('^') {
                pull_up = true;
                s = rest;
            } else {
                break;
            }
        }

        let digits = s.strip_prefix("gpio").ok_or(ConfigError::InvalidPin)?;
        let pin: u8 = digits.parse().map_err(|_| ConfigError::InvalidPin)?;

        Ok(Self {
            pin,
            inverted,
            pull_up,
        })
    }
}

impl fmt::Display for PinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("!")?;
        }
        if self.pull_up {
            f.write_str("^")?;
        }
        write!(f, "gpio{}", self.pin)
    }
}

// Serialized as the pin string in every format, so machine.toml and the
// postcard blob share one representation.
#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt::{self, Write};

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::PinSpec;

    impl Serialize for PinSpec {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut buf: heapless::String<12> = heapless::String::new();
            write!(buf, "{}", self).map_err(|_| serde::ser::Error::custom("pin string too long"))?;
            serializer.serialize_str(&buf)
        }
    }

    struct PinVisitor;

    impl<'de> Visitor<'de> for PinVisitor {
        type Value = PinSpec;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a pin string like \"gpio5\" or \"!^gpio10\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<PinSpec, E> {
            v.parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    impl<'de> Deserialize<'de> for PinSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(PinVisitor)
        }
    }
}

/// Check a single pin against the board range and reserved functions
pub fn check_assignable(pin: u8) -> Result<(), ConfigError> {
    if pin > MAX_GPIO {
        return Err(ConfigError::PinOutOfRange(pin));
    }
    if RESERVED_PINS.contains(&pin) {
        return Err(ConfigError::PinReserved(pin));
    }
    Ok(())
}

/// Check that two pins handled by one driver share active-low polarity
pub fn check_same_polarity(first: PinSpec, second: PinSpec) -> Result<(), ConfigError> {
    if first.inverted != second.inverted {
        return Err(ConfigError::PolarityMismatch {
            first: first.pin,
            second: second.pin,
        });
    }
    Ok(())
}

/// Check a set of pins for range, reservation and duplicates
pub fn check_pins(pins: &[PinSpec]) -> Result<(), ConfigError> {
    let mut used: u32 = 0;
    for spec in pins {
        check_assignable(spec.pin)?;
        let bit = 1u32 << spec.pin;
        if used & bit != 0 {
            return Err(ConfigError::PinConflict(spec.pin));
        }
        used |= bit;
    }
    Ok(())
}
