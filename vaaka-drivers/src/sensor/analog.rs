//! Analog sensor (force sensor, strain gauge amplifier)

use heapless::String;
use vaaka_core::analog::{AnalogScaling, DeltaTracker};
use vaaka_core::config::{label, AnalogConfig, MAX_LABEL_LEN};
use vaaka_core::fault::ConfigError;
use vaaka_core::traits::AnalogInput;

use super::AnalogSource;

/// Single-channel analog sensor with delta tracking
pub struct AnalogSensor<A> {
    source: A,
    scaling: AnalogScaling,
    delta: DeltaTracker,
    tolerance: f32,
    label: String<MAX_LABEL_LEN>,
    verbose: bool,
}

impl<A: AnalogSource> AnalogSensor<A> {
    /// Create a new sensor
    ///
    /// Takes one reading as the drift baseline.
    pub fn new(mut source: A, config: &AnalogConfig) -> Result<Self, ConfigError> {
        let scaling = AnalogScaling::new(config)?;
        let initial = scaling.apply(source.read_raw());
        Ok(Self {
            source,
            scaling,
            delta: DeltaTracker::new(initial),
            tolerance: config.tolerance,
            label: String::new(),
            verbose: false,
        })
    }

    /// Set the name used in diagnostics
    pub fn set_label(&mut self, name: &str) {
        self.label = label(name);
    }

    /// Enable or disable drift diagnostics
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set the delta magnitude above which [`AnalogSensor::exceeds_tolerance`] reports
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = tolerance;
    }

    /// Check if the delta from the last [`AnalogInput::update`] is above tolerance
    pub fn exceeds_tolerance(&self) -> bool {
        self.delta.exceeds(self.tolerance)
    }

    /// The baseline stored by the last update
    pub fn baseline(&self) -> f32 {
        self.delta.baseline()
    }

    /// Check if diagnostics are enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Sensor name
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<A: AnalogSource> AnalogInput for AnalogSensor<A> {
    fn read(&mut self) -> f32 {
        self.scaling.apply(self.source.read_raw())
    }

    fn update(&mut self) -> f32 {
        let reading = self.read();
        let delta = self.delta.update(reading);

        #[cfg(feature = "defmt")]
        if self.verbose && self.exceeds_tolerance() {
            defmt::debug!("{}: drift {}", self.label.as_str(), delta);
        }

        delta
    }
}
