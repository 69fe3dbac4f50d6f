//! Relay-pair conveyor motor
//!
//! Two relays select the direction; energizing both would short the
//! motor supply. Every run command therefore releases both relays before
//! asserting one.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use heapless::String;
use vaaka_core::config::{label, MAX_LABEL_LEN};
use vaaka_core::traits::{ConveyorDrive, Direction};

/// Conveyor motor driven by a clockwise and a counter-clockwise relay
pub struct BidirectionalMotor<P> {
    cw: P,
    ccw: P,
    /// Relay energized = pin low
    inverted: bool,
    direction: Option<Direction>,
    label: String<MAX_LABEL_LEN>,
    verbose: bool,
}

impl<P: OutputPin<Error = Infallible>> BidirectionalMotor<P> {
    /// Create a new motor with both relays released
    pub fn new(cw: P, ccw: P, inverted: bool) -> Self {
        let mut motor = Self {
            cw,
            ccw,
            inverted,
            direction: None,
            label: String::new(),
            verbose: false,
        };
        motor.release_both();
        motor
    }

    /// Set the name used in diagnostics
    pub fn set_label(&mut self, name: &str) {
        self.label = label(name);
    }

    /// Enable or disable command diagnostics
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if diagnostics are enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn drive(pin: &mut P, inverted: bool, on: bool) {
        let result = if on != inverted {
            pin.set_high()
        } else {
            pin.set_low()
        };
        result.unwrap_or_else(|e| match e {})
    }

    fn release_both(&mut self) {
        Self::drive(&mut self.cw, self.inverted, false);
        Self::drive(&mut self.ccw, self.inverted, false);
    }

    fn energize(&mut self, dir: Direction) {
        self.release_both();
        match dir {
            Direction::Clockwise => Self::drive(&mut self.cw, self.inverted, true),
            Direction::CounterClockwise => Self::drive(&mut self.ccw, self.inverted, true),
        }
        self.direction = Some(dir);

        #[cfg(feature = "defmt")]
        if self.verbose {
            defmt::debug!("{}: run {}", self.label.as_str(), dir);
        }
    }
}

impl<P: OutputPin<Error = Infallible>> ConveyorDrive for BidirectionalMotor<P> {
    fn run_cw(&mut self) {
        self.energize(Direction::Clockwise);
    }

    fn run_ccw(&mut self) {
        self.energize(Direction::CounterClockwise);
    }

    fn stop(&mut self) {
        self.release_both();
        self.direction = None;
    }

    fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockOutput;

    #[test]
    fn test_starts_released() {
        let cw = MockOutput::default();
        let ccw = MockOutput::default();
        let motor = BidirectionalMotor::new(cw.clone(), ccw.clone(), false);
        assert!(!cw.is_high());
        assert!(!ccw.is_high());
        assert_eq!(motor.direction(), None);
    }

    #[test]
    fn test_direction_change_releases_first() {
        let cw = MockOutput::default();
        let ccw = MockOutput::default();
        let mut motor = BidirectionalMotor::new(cw.clone(), ccw.clone(), false);

        motor.run_cw();
        assert!(cw.is_high());
        assert!(!ccw.is_high());
        assert_eq!(motor.direction(), Some(Direction::Clockwise));

        cw.clear();
        ccw.clear();
        motor.run_ccw();
        // cw was released before ccw was energized
        assert_eq!(cw.writes(), [false]);
        assert_eq!(ccw.writes(), [false, true]);
        assert!(!cw.is_high());
        assert!(ccw.is_high());
        assert!(motor.is_running());
    }

    #[test]
    fn test_stop_is_unconditional() {
        let cw = MockOutput::default();
        let ccw = MockOutput::default();
        let mut motor = BidirectionalMotor::new(cw.clone(), ccw.clone(), false);
        motor.stop();
        motor.run(Direction::CounterClockwise);
        motor.stop();
        assert!(!cw.is_high());
        assert!(!ccw.is_high());
        assert!(!motor.is_running());
    }

    #[test]
    fn test_active_low_relays() {
        let cw = MockOutput::default();
        let ccw = MockOutput::default();
        let mut motor = BidirectionalMotor::new(cw.clone(), ccw.clone(), true);
        // Released = high
        assert!(cw.is_high());
        assert!(ccw.is_high());
        motor.run_cw();
        assert!(!cw.is_high());
        assert!(ccw.is_high());
    }
}
