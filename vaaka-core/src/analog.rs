//! Analog scaling
//!
//! Converts raw ADC counts into either raw readings or a simplified
//! `[0, simple_max]` scale rounded to a fixed number of decimals, and tracks
//! the delta between consecutive readings.

use micromath::F32Ext;

use crate::config::AnalogConfig;
use crate::fault::ConfigError;
use crate::telemetry::MAX_DECIMALS;

const POW10: [f32; MAX_DECIMALS as usize + 1] =
    [1.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0];

/// Round to `decimals` places (clamped to [`MAX_DECIMALS`])
pub fn round_to(value: f32, decimals: u8) -> f32 {
    let factor = POW10[decimals.min(MAX_DECIMALS) as usize];
    F32Ext::round(value * factor) / factor
}

/// Raw-to-reading conversion for one analog channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogScaling {
    simplified: bool,
    simple_max: u16,
    raw_max: u16,
    decimals: u8,
}

impl AnalogScaling {
    /// Build from configuration, rejecting empty ranges and excess precision
    pub fn new(config: &AnalogConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            simplified: config.simplified,
            simple_max: config.simple_max,
            raw_max: config.raw_max,
            decimals: config.decimals,
        })
    }

    /// Convert a raw sample
    pub fn apply(&self, raw: u16) -> f32 {
        if !self.simplified {
            return raw as f32;
        }
        let scaled = raw as f32 * self.simple_max as f32 / self.raw_max as f32;
        round_to(scaled, self.decimals)
    }

    /// Check if readings are rescaled
    pub fn is_simplified(&self) -> bool {
        self.simplified
    }
}

/// Tracks the previous reading and the last delta
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaTracker {
    baseline: f32,
    last_delta: f32,
}

impl DeltaTracker {
    /// Start tracking from an initial reading, with no delta yet
    pub fn new(initial: f32) -> Self {
        Self {
            baseline: initial,
            last_delta: 0.0,
        }
    }

    /// Store `reading` as the new baseline and return the delta from the old one
    pub fn update(&mut self, reading: f32) -> f32 {
        self.last_delta = reading - self.baseline;
        self.baseline = reading;
        self.last_delta
    }

    /// The stored baseline
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Delta computed by the last [`DeltaTracker::update`]
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    /// Check if the last delta magnitude is strictly above `tolerance`
    pub fn exceeds(&self, tolerance: f32) -> bool {
        F32Ext::abs(self.last_delta) > tolerance
    }
}
