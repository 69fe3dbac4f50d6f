//! Servo PWM for the lift actuator
//!
//! The lift is a hobby servo driven at 50 Hz. Positions are expressed as
//! 16-bit duty values over the full 20 ms frame (e.g. 1500 ≈ 0.46 ms), so the
//! adapter reports a max duty of `u16::MAX` and rescales to the slice's
//! counter range.

use core::convert::Infallible;

use embassy_rp::pwm::{Config, Pwm};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

/// Clock divider: 125 MHz / 40 = 3.125 MHz counter clock
const SERVO_DIVIDER: u8 = 40;

/// Counter wrap for a 20 ms frame at 3.125 MHz
const SERVO_TOP: u16 = 62_499;

/// Map a 16-bit duty value onto the counter range
fn compare_for(duty: u16) -> u16 {
    ((duty as u32 * (SERVO_TOP as u32 + 1)) >> 16) as u16
}

/// 50 Hz servo output on channel A of a PWM slice
pub struct ServoPwm {
    pwm: Pwm<'static>,
    config: Config,
}

impl ServoPwm {
    /// Wrap a slice configured with `Pwm::new_output_a`
    ///
    /// The output starts at 0 % duty (no pulse) until the first move.
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = Config::default();
        config.divider = SERVO_DIVIDER.into();
        config.top = SERVO_TOP;
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }

    /// Current compare value in counter ticks
    pub fn compare(&self) -> u16 {
        self.config.compare_a
    }
}

impl ErrorType for ServoPwm {
    type Error = Infallible;
}

impl SetDutyCycle for ServoPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.config.compare_a = compare_for(duty);
        self.pwm.set_config(&self.config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_scaling() {
        assert_eq!(compare_for(0), 0);
        assert_eq!(compare_for(u16::MAX), SERVO_TOP);
        // 1500/65536 of a 62500-tick frame
        assert_eq!(compare_for(1500), 1430);
    }
}
