//! Configuration type definitions
//!
//! Every section has defaults matching the reference machine, so a
//! `machine.toml` only needs to list what differs. Configuration is embedded
//! in the firmware as postcard-serialized binary data.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::pins::{check_pins, check_same_polarity, PinSpec};
use crate::fault::ConfigError;
use crate::telemetry::MAX_DECIMALS;
use crate::traits::Setpoint;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Build a label, truncating at [`MAX_LABEL_LEN`] characters
pub fn label(s: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// GPIO assignment for every configurable function
///
/// The lift PWM output and the analog inputs are board-fixed
/// (see [`super::pins::RESERVED_PINS`]).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PinConfig {
    /// Conveyor relay, clockwise (towards start)
    pub conveyor_cw: PinSpec,
    /// Conveyor relay, counter-clockwise (towards end)
    pub conveyor_ccw: PinSpec,
    /// Start station sensor (A1)
    pub station_start: PinSpec,
    /// First middle station sensor (A2)
    pub station_mid_a: PinSpec,
    /// Second middle station sensor (B2)
    pub station_mid_b: PinSpec,
    /// End station sensor (B1)
    pub station_end: PinSpec,
    /// Start button
    pub latch_start: PinSpec,
    /// Stop button
    pub latch_stop: PinSpec,
    /// Running indicator LED
    pub running_led: PinSpec,
    /// Error indicator LED
    pub error_led: PinSpec,
    /// On-board heartbeat LED
    pub heartbeat_led: PinSpec,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            conveyor_cw: PinSpec::new(5),
            conveyor_ccw: PinSpec::new(6),
            station_start: PinSpec::active_low_pull_up(10),
            station_mid_a: PinSpec::active_low_pull_up(12),
            station_mid_b: PinSpec::active_low_pull_up(15),
            station_end: PinSpec::active_low_pull_up(14),
            latch_start: PinSpec::active_low_pull_up(2),
            latch_stop: PinSpec::active_low_pull_up(3),
            running_led: PinSpec::new(16),
            error_led: PinSpec::new(17),
            heartbeat_led: PinSpec::new(25),
        }
    }
}

impl PinConfig {
    /// All assigned pins, in declaration order
    pub fn all(&self) -> [PinSpec; 11] {
        [
            self.conveyor_cw,
            self.conveyor_ccw,
            self.station_start,
            self.station_mid_a,
            self.station_mid_b,
            self.station_end,
            self.latch_start,
            self.latch_stop,
            self.running_led,
            self.error_led,
            self.heartbeat_led,
        ]
    }

    /// Check range, reservation, duplicates and pair polarity
    ///
    /// The relay pair, the button pair and the LED pair each share one
    /// polarity flag in their driver.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pins(&self.all())?;
        check_same_polarity(self.conveyor_cw, self.conveyor_ccw)?;
        check_same_polarity(self.latch_start, self.latch_stop)?;
        check_same_polarity(self.running_led, self.error_led)
    }
}

/// Station display names, used as telemetry column headers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct StationConfig {
    /// Start station
    pub start: String<MAX_LABEL_LEN>,
    /// Middle station reached on the outbound leg
    pub mid_a: String<MAX_LABEL_LEN>,
    /// Middle station reached on the return leg
    pub mid_b: String<MAX_LABEL_LEN>,
    /// End station
    pub end: String<MAX_LABEL_LEN>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            start: label("A1"),
            mid_a: label("A2"),
            mid_b: label("B2"),
            end: label("B1"),
        }
    }
}

/// Lift actuator range and ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LiftConfig {
    /// Lowest raw position (PWM duty)
    pub min: i32,
    /// Highest raw position (PWM duty)
    pub max: i32,
    /// Raw units per ramp step
    pub rate: u32,
    /// Settle delay after each step (µs)
    pub settle_us: u32,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            min: 1500,
            max: 8150,
            rate: 250,
            settle_us: 5000,
        }
    }
}

impl LiftConfig {
    /// Reject empty ranges, ranges outside the 16-bit duty span and zero rates
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min >= self.max || self.min < 0 || self.max > u16::MAX as i32 {
            return Err(ConfigError::InvalidLiftRange);
        }
        if self.rate == 0 {
            return Err(ConfigError::ZeroLiftRate);
        }
        Ok(())
    }
}

/// Analog reading conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AnalogConfig {
    /// Rescale raw counts to `[0, simple_max]`
    pub simplified: bool,
    /// Upper end of the simplified scale
    pub simple_max: u16,
    /// Raw count at full scale
    pub raw_max: u16,
    /// Decimal places for simplified readings
    pub decimals: u8,
    /// Delta magnitude above which a reading counts as drifting
    pub tolerance: f32,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            simplified: false,
            simple_max: 100,
            raw_max: 4095,
            decimals: 2,
            tolerance: 0.0,
        }
    }
}

impl AnalogConfig {
    /// Reject empty ranges and excess precision
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.raw_max == 0 || self.simple_max == 0 {
            return Err(ConfigError::InvalidAnalogRange);
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidPrecision(self.decimals));
        }
        Ok(())
    }
}

/// Sequence timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SequenceConfig {
    /// Controller tick period (ms)
    pub tick_ms: u32,
    /// Settle time before raising and after lowering the lift (ms)
    pub settle_ms: u32,
    /// Time the lift holds at the weigh setpoint (ms)
    pub hold_ms: u32,
    /// Dwell at the end station (ms)
    pub end_dwell_ms: u32,
    /// Lift setpoint while weighing
    pub weigh_setpoint: Setpoint,
    /// Lift setpoint while the conveyor moves
    pub rest_setpoint: Setpoint,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            tick_ms: 300,
            settle_ms: 1000,
            hold_ms: 1000,
            end_dwell_ms: 1000,
            weigh_setpoint: Setpoint::Max,
            rest_setpoint: Setpoint::Min,
        }
    }
}

impl SequenceConfig {
    /// Reject a zero tick period
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidTickPeriod);
        }
        Ok(())
    }
}

/// Telemetry table format and rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TelemetryConfig {
    /// Minimum time between accepted records (ms)
    pub min_interval_ms: u32,
    /// Prefix each row with elapsed seconds
    pub add_timer: bool,
    /// Decimal places of the time column
    pub timer_decimals: u8,
    /// Column separator
    pub separator: char,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
            add_timer: true,
            timer_decimals: 0,
            separator: ';',
        }
    }
}

impl TelemetryConfig {
    /// Reject separators that would corrupt the table
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sep = self.separator;
        if sep.is_alphanumeric() || sep == '"' || sep == '\'' || sep == '\n' || sep == '\r' {
            return Err(ConfigError::InvalidSeparator(sep));
        }
        if self.timer_decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidPrecision(self.timer_decimals));
        }
        Ok(())
    }
}

/// Start/stop button sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LatchConfig {
    /// Consecutive samples before an input level is accepted (1 = unfiltered)
    pub debounce_samples: u8,
    /// Button poll period in the monitor task (ms)
    pub monitor_ms: u32,
}

impl Default for LatchConfig {
    fn default() -> Self {
        Self {
            debounce_samples: 1,
            monitor_ms: 50,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MachineConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// GPIO assignment
    pub pins: PinConfig,
    /// Station names
    pub stations: StationConfig,
    /// Lift actuator
    pub lift: LiftConfig,
    /// Analog sensors
    pub analog: AnalogConfig,
    /// Sequence timing
    pub sequence: SequenceConfig,
    /// Telemetry log
    pub telemetry: TelemetryConfig,
    /// Start/stop buttons
    pub latch: LatchConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            pins: PinConfig::default(),
            stations: StationConfig::default(),
            lift: LiftConfig::default(),
            analog: AnalogConfig::default(),
            sequence: SequenceConfig::default(),
            telemetry: TelemetryConfig::default(),
            latch: LatchConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch(self.version));
        }
        self.pins.validate()?;
        self.lift.validate()?;
        self.analog.validate()?;
        self.sequence.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
