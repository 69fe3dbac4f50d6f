//! Fault taxonomy
//!
//! Fatal faults (configuration, safety, missing device) unwind to a single
//! top-level handler that stops the conveyor and hands control to the status
//! indicator. Bounds rejections are recoverable and never leave the actuator
//! that detected them.

use core::fmt;

/// Configuration errors
///
/// Raised while validating the machine configuration, while decoding a
/// published sequence state, or when a component is wired inconsistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin string is not of the form `gpioN` / `!gpioN`
    InvalidPin,
    /// Pin number is outside the board GPIO range
    PinOutOfRange(u8),
    /// Pin is reserved for a board-fixed function (PWM, ADC)
    PinReserved(u8),
    /// The same pin is assigned to two functions
    PinConflict(u8),
    /// Paired pins driven by one driver disagree on active-low polarity
    PolarityMismatch {
        /// First pin of the pair
        first: u8,
        /// Second pin of the pair
        second: u8,
    },
    /// Named setpoint is not one of `min`, `mid`, `max`
    InvalidSetpoint,
    /// Sequence state code is not part of the sequence graph
    UnknownState(u8),
    /// Lift range is empty or inverted (`min >= max`)
    InvalidLiftRange,
    /// Lift step rate is zero
    ZeroLiftRate,
    /// Analog raw range or simplified range is zero
    InvalidAnalogRange,
    /// Decimal precision above the supported maximum
    InvalidPrecision(u8),
    /// Controller tick period is zero
    InvalidTickPeriod,
    /// Telemetry separator would corrupt the table
    InvalidSeparator(char),
    /// Multi-axis sensor constructed without any wired axis
    NoAxesWired,
    /// Telemetry record arity differs from the header arity
    RecordArity {
        /// Columns in the header (excluding the time column)
        expected: u8,
        /// Columns in the rejected record
        got: u8,
    },
    /// More telemetry columns than the record buffer holds
    TooManyColumns,
    /// Appending telemetry before `setup` wrote a header
    TelemetryNotSetUp,
    /// Stored configuration has an unexpected layout version
    VersionMismatch(u8),
    /// Stored configuration could not be decoded
    Undecodable,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin => write!(f, "invalid pin string"),
            Self::PinOutOfRange(pin) => write!(f, "pin gpio{} out of range", pin),
            Self::PinReserved(pin) => write!(f, "pin gpio{} is reserved by the board", pin),
            Self::PinConflict(pin) => write!(f, "pin gpio{} assigned twice", pin),
            Self::PolarityMismatch { first, second } => {
                write!(f, "gpio{} and gpio{} must share polarity", first, second)
            }
            Self::InvalidSetpoint => write!(f, "setpoint must be min, mid or max"),
            Self::UnknownState(code) => write!(f, "unknown sequence state code {}", code),
            Self::InvalidLiftRange => write!(f, "lift min must be below lift max"),
            Self::ZeroLiftRate => write!(f, "lift rate must be non-zero"),
            Self::InvalidAnalogRange => write!(f, "analog range must be non-zero"),
            Self::InvalidPrecision(d) => write!(f, "{} decimals not supported", d),
            Self::InvalidTickPeriod => write!(f, "tick period must be non-zero"),
            Self::InvalidSeparator(c) => write!(f, "separator {:?} not allowed", c),
            Self::NoAxesWired => write!(f, "at least one axis must be wired"),
            Self::RecordArity { expected, got } => {
                write!(f, "record has {} fields, header has {}", got, expected)
            }
            Self::TooManyColumns => write!(f, "too many telemetry columns"),
            Self::TelemetryNotSetUp => write!(f, "telemetry header not written"),
            Self::VersionMismatch(v) => write!(f, "config version {} not supported", v),
            Self::Undecodable => write!(f, "stored config could not be decoded"),
        }
    }
}

/// Safety faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyFault {
    /// Start and stop were physically asserted on the same poll
    BothPressed,
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BothPressed => write!(f, "start and stop pressed simultaneously"),
        }
    }
}

/// Devices the controller depends on but cannot recreate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
    /// Telemetry log target (file, serial link)
    TelemetryTarget,
}

/// Fatal fault raised by a controller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Invalid wiring, setpoint, state code or telemetry layout
    Configuration(ConfigError),
    /// Physical operator input in a forbidden combination
    Safety(SafetyFault),
    /// A collaborator disappeared (e.g. the log target stopped accepting writes)
    MissingDevice(Device),
}

impl Fault {
    /// Number of error LED blinks used to signal this fault (0 = indefinite)
    pub fn blink_count(&self) -> u8 {
        // Every fatal fault blinks until power cycle; no automatic restart
        0
    }

    /// Check if this is a safety fault
    pub fn is_safety(&self) -> bool {
        matches!(self, Fault::Safety(_))
    }
}

impl From<ConfigError> for Fault {
    fn from(e: ConfigError) -> Self {
        Fault::Configuration(e)
    }
}

impl From<SafetyFault> for Fault {
    fn from(e: SafetyFault) -> Self {
        Fault::Safety(e)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration fault: {}", e),
            Self::Safety(e) => write!(f, "safety fault: {}", e),
            Self::MissingDevice(Device::TelemetryTarget) => {
                write!(f, "missing device: telemetry target")
            }
        }
    }
}

/// A commanded actuator position outside the configured range
///
/// Recoverable: the command is ignored and execution continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundsRejection {
    /// Requested raw position
    pub requested: i32,
    /// Lower bound
    pub min: i32,
    /// Upper bound
    pub max: i32,
}

impl BoundsRejection {
    /// Check if the request was below the range
    pub fn too_small(&self) -> bool {
        self.requested < self.min
    }
}

impl fmt::Display for BoundsRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.too_small() {
            write!(f, "cannot move to {}: below min {}", self.requested, self.min)
        } else {
            write!(f, "cannot move to {}: above max {}", self.requested, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_fault_conversions() {
        let f: Fault = ConfigError::InvalidSetpoint.into();
        assert_eq!(f, Fault::Configuration(ConfigError::InvalidSetpoint));
        assert!(!f.is_safety());

        let f: Fault = SafetyFault::BothPressed.into();
        assert!(f.is_safety());
        assert_eq!(f.blink_count(), 0);
    }

    #[test]
    fn test_bounds_rejection_message() {
        let low = BoundsRejection { requested: 10, min: 1500, max: 8150 };
        assert!(low.too_small());
        assert_eq!(low.to_string(), "cannot move to 10: below min 1500");

        let high = BoundsRejection { requested: 9000, min: 1500, max: 8150 };
        assert!(!high.too_small());
        assert_eq!(high.to_string(), "cannot move to 9000: above max 8150");
    }
}
