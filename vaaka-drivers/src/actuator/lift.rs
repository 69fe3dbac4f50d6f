//! Servo lift actuator
//!
//! The lift is a hobby servo whose position is the raw PWM duty. Moves
//! between named setpoints are ramped in steps of `rate` so the product is
//! not thrown off the scale, with a settle delay after every step.
//!
//! Raw moves outside `[min, max]` are rejected rather than clamped.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use heapless::String;
use vaaka_core::config::{label, LiftConfig, MAX_LABEL_LEN};
use vaaka_core::fault::{BoundsRejection, ConfigError};
use vaaka_core::traits::{LiftDrive, Setpoint};

/// Bounded, ramped position actuator
pub struct PositionActuator<P, D> {
    pwm: P,
    delay: D,
    min: i32,
    max: i32,
    rate: i32,
    settle_us: u32,
    position: i32,
    /// Raw moves issued since construction (including the initial one)
    raw_moves: u32,
    label: String<MAX_LABEL_LEN>,
    verbose: bool,
}

impl<P, D> PositionActuator<P, D>
where
    P: SetDutyCycle<Error = Infallible>,
    D: DelayNs,
{
    /// Create a new actuator and move it to mid
    pub fn new(pwm: P, delay: D, config: &LiftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut lift = Self {
            pwm,
            delay,
            min: config.min,
            max: config.max,
            rate: config.rate.min(i32::MAX as u32) as i32,
            settle_us: config.settle_us,
            position: config.min,
            raw_moves: 0,
            label: String::new(),
            verbose: false,
        };
        lift.force_move(Setpoint::Mid.resolve(config.min, config.max));
        Ok(lift)
    }

    /// Set the name used in diagnostics
    pub fn set_label(&mut self, name: &str) {
        self.label = label(name);
    }

    /// Enable or disable bounds-rejection diagnostics
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if diagnostics are enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Move to a raw position within `[min, max]`
    ///
    /// Out-of-range values leave the position unchanged.
    pub fn move_to_raw(&mut self, value: i32) -> Result<(), BoundsRejection> {
        if value < self.min || value > self.max {
            let rejection = BoundsRejection {
                requested: value,
                min: self.min,
                max: self.max,
            };

            #[cfg(feature = "defmt")]
            if self.verbose {
                defmt::warn!("{}: {}", self.label.as_str(), rejection);
            }

            return Err(rejection);
        }
        self.force_move(value);
        Ok(())
    }

    /// Move without a bounds check
    ///
    /// Only used to put the servo in a known position at startup.
    pub fn force_move(&mut self, value: i32) {
        let duty = value.clamp(0, u16::MAX as i32) as u16;
        self.pwm
            .set_duty_cycle(duty)
            .unwrap_or_else(|e| match e {});
        self.position = value;
        self.raw_moves = self.raw_moves.wrapping_add(1);
        self.delay.delay_us(self.settle_us);
    }

    /// Raw moves issued since construction
    pub fn raw_moves(&self) -> u32 {
        self.raw_moves
    }

    /// Configured range
    pub fn range(&self) -> (i32, i32) {
        (self.min, self.max)
    }
}

impl<P, D> LiftDrive for PositionActuator<P, D>
where
    P: SetDutyCycle<Error = Infallible>,
    D: DelayNs,
{
    fn move_to_named(&mut self, pos: Setpoint) {
        let target = self.setpoint_position(pos);
        while self.position != target {
            let step = (target - self.position).clamp(-self.rate, self.rate);
            if self.move_to_raw(self.position + step).is_err() {
                // Only reachable if the position was forced out of range
                break;
            }
        }
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn setpoint_position(&self, pos: Setpoint) -> i32 {
        pos.resolve(self.min, self.max)
    }
}
