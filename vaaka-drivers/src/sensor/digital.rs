//! Digital presence sensor
//!
//! Capacitive, IR and contact sensors all reduce to one GPIO level.
//! Polarity is applied on every read, so callers only ever see
//! `true` = present.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use heapless::String;
use vaaka_core::config::{label, MAX_LABEL_LEN};
use vaaka_core::traits::DigitalInput;

/// Digital sensor with one stored sample for change detection
pub struct DigitalSensor<P> {
    pin: P,
    inverted: bool,
    last: bool,
    label: String<MAX_LABEL_LEN>,
    verbose: bool,
}

impl<P: InputPin<Error = Infallible>> DigitalSensor<P> {
    /// Create a new sensor
    ///
    /// The stored sample starts as "not present".
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            last: false,
            label: String::new(),
            verbose: false,
        }
    }

    /// Create an active-low sensor (pulled-up open-collector output)
    pub fn active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Set the name used in diagnostics
    pub fn set_label(&mut self, name: &str) {
        self.label = label(name);
    }

    /// Enable or disable change diagnostics
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
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

impl<P: InputPin<Error = Infallible>> DigitalInput for DigitalSensor<P> {
    fn read(&mut self) -> bool {
        let high = self.pin.is_high().unwrap_or_else(|e| match e {});
        high != self.inverted
    }

    fn changed(&mut self) -> bool {
        let now = self.read();
        let changed = now != self.last;
        self.last = now;

        #[cfg(feature = "defmt")]
        if changed && self.verbose {
            defmt::debug!("{}: {}", self.label.as_str(), now);
        }

        changed
    }

    fn state(&self) -> bool {
        self.last
    }
}
