//! Telemetry records
//!
//! Record layout, value formatting and rate limiting shared by every
//! telemetry sink. The sinks themselves (CSV over a byte writer) live in
//! `vaaka-drivers`.

mod rate;

pub use rate::RateLimiter;

use core::fmt;

use crate::fault::{ConfigError, Device, Fault};

/// Maximum columns in a record (excluding the time column)
pub const MAX_COLUMNS: usize = 16;

/// Maximum decimals for the time column and analog readings
pub const MAX_DECIMALS: u8 = 6;

/// A single telemetry value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    /// Digital sensor state, written as `1` / `0`
    Bool(bool),
    /// Analog reading
    Number(f32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("1"),
            Value::Bool(false) => f.write_str("0"),
            Value::Number(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v)
    }
}

/// Telemetry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// Header or record layout is invalid
    Layout(ConfigError),
    /// The underlying writer rejected a write
    Write,
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(e) => write!(f, "telemetry layout: {}", e),
            Self::Write => write!(f, "telemetry write failed"),
        }
    }
}

impl From<ConfigError> for TelemetryError {
    fn from(e: ConfigError) -> Self {
        TelemetryError::Layout(e)
    }
}

impl From<TelemetryError> for Fault {
    fn from(e: TelemetryError) -> Self {
        match e {
            TelemetryError::Layout(e) => Fault::Configuration(e),
            TelemetryError::Write => Fault::MissingDevice(Device::TelemetryTarget),
        }
    }
}

/// Check a header arity against the record buffer capacity
pub fn check_header(columns: usize) -> Result<(), ConfigError> {
    if columns > MAX_COLUMNS {
        return Err(ConfigError::TooManyColumns);
    }
    Ok(())
}

/// Check a record against the arity fixed at setup
pub fn check_arity(expected: usize, got: usize) -> Result<(), ConfigError> {
    if expected != got {
        return Err(ConfigError::RecordArity {
            expected: expected as u8,
            got: got.min(u8::MAX as usize) as u8,
        });
    }
    Ok(())
}

/// Elapsed time in seconds, formatted with a fixed number of decimals
///
/// Uses integer arithmetic with round-half-up, so `1500 ms` at 0 decimals
/// prints `2` and at 1 decimal prints `1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seconds {
    /// Elapsed milliseconds
    pub ms: u32,
    /// Decimal places (clamped to [`MAX_DECIMALS`])
    pub decimals: u8,
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.decimals.min(MAX_DECIMALS) as u32;
        let scale = 10u64.pow(decimals);
        let scaled = (self.ms as u64 * scale + 500) / 1000;
        let whole = scaled / scale;
        if decimals == 0 {
            write!(f, "{}", whole)
        } else {
            let frac = scaled % scale;
            write!(f, "{}.{:0width$}", whole, frac, width = decimals as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "0");
        assert_eq!(Value::Number(12.5).to_string(), "12.5");
        assert_eq!(Value::Number(3.0).to_string(), "3");
    }

    #[test]
    fn test_seconds_display() {
        assert_eq!(Seconds { ms: 0, decimals: 0 }.to_string(), "0");
        assert_eq!(Seconds { ms: 1499, decimals: 0 }.to_string(), "1");
        assert_eq!(Seconds { ms: 1500, decimals: 0 }.to_string(), "2");
        assert_eq!(Seconds { ms: 1500, decimals: 1 }.to_string(), "1.5");
        assert_eq!(Seconds { ms: 1234, decimals: 3 }.to_string(), "1.234");
        assert_eq!(Seconds { ms: 5, decimals: 2 }.to_string(), "0.01");
        assert_eq!(Seconds { ms: 42, decimals: 3 }.to_string(), "0.042");
    }

    #[test]
    fn test_arity() {
        assert_eq!(check_arity(3, 3), Ok(()));
        assert_eq!(
            check_arity(3, 2),
            Err(ConfigError::RecordArity { expected: 3, got: 2 })
        );
        assert_eq!(check_header(MAX_COLUMNS), Ok(()));
        assert_eq!(check_header(MAX_COLUMNS + 1), Err(ConfigError::TooManyColumns));
    }

    #[test]
    fn test_error_into_fault() {
        let f: Fault = TelemetryError::Write.into();
        assert_eq!(f, Fault::MissingDevice(Device::TelemetryTarget));
        let f: Fault = TelemetryError::Layout(ConfigError::TooManyColumns).into();
        assert_eq!(f, Fault::Configuration(ConfigError::TooManyColumns));
    }
}
