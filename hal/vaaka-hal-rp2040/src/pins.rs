//! Config-driven pin allocation
//!
//! Pin numbers come from `machine.toml`, so GPIOs are handed out by number at
//! runtime. Board-fixed functions (lift PWM, telemetry TX, analog inputs) are
//! split off into [`BoardPeripherals`] up front and can never be taken from
//! the bank.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::peripherals;
use embassy_rp::{Peri, Peripherals};

use vaaka_core::config::pins::{MAX_GPIO, RESERVED_PINS};
use vaaka_core::config::PinSpec;
use vaaka_core::fault::ConfigError;

const BANK_SIZE: usize = MAX_GPIO as usize + 1;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin reserved for a board-fixed function
    Reserved(u8),
}

impl From<PinError> for ConfigError {
    fn from(e: PinError) -> Self {
        match e {
            PinError::InvalidPin(pin) => ConfigError::PinOutOfRange(pin),
            PinError::AlreadyTaken(pin) => ConfigError::PinConflict(pin),
            PinError::Reserved(pin) => ConfigError::PinReserved(pin),
        }
    }
}

/// Peripherals with a fixed role on the board
pub struct BoardPeripherals {
    /// Lift servo output (GPIO0, PWM slice 0 channel A)
    pub lift_pin: Peri<'static, peripherals::PIN_0>,
    pub lift_slice: Peri<'static, peripherals::PWM_SLICE0>,
    /// Telemetry TX (GPIO4, UART1)
    pub telemetry_pin: Peri<'static, peripherals::PIN_4>,
    pub telemetry_uart: Peri<'static, peripherals::UART1>,
    /// ADC block and its three wired inputs
    pub adc: Peri<'static, peripherals::ADC>,
    pub force_pin: Peri<'static, peripherals::PIN_26>,
    pub accel_x_pin: Peri<'static, peripherals::PIN_27>,
    pub accel_y_pin: Peri<'static, peripherals::PIN_28>,
}

/// Bank of general-purpose pins, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; BANK_SIZE],
}

impl PinBank {
    /// Split the chip peripherals into a pin bank and the board-fixed set
    ///
    /// Reserved slots start empty.
    pub fn split(p: Peripherals) -> (Self, BoardPeripherals) {
        let bank = Self {
            pins: [
                None,
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                None,
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                None,
                None,
                None,
                Some(p.PIN_29.into()),
            ],
        };
        let board = BoardPeripherals {
            lift_pin: p.PIN_0,
            lift_slice: p.PWM_SLICE0,
            telemetry_pin: p.PIN_4,
            telemetry_uart: p.UART1,
            adc: p.ADC,
            force_pin: p.PIN_26,
            accel_x_pin: p.PIN_27,
            accel_y_pin: p.PIN_28,
        };
        (bank, board)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num > MAX_GPIO {
            return Err(PinError::InvalidPin(pin_num));
        }
        if RESERVED_PINS.contains(&pin_num) {
            return Err(PinError::Reserved(pin_num));
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        self.pins
            .get(pin_num as usize)
            .is_some_and(|slot| slot.is_some())
    }

    /// Take a pin and configure it as an input
    ///
    /// Polarity is applied by the driver, not here.
    pub fn input(&mut self, spec: PinSpec) -> Result<Input<'static>, PinError> {
        let pull = if spec.pull_up { Pull::Up } else { Pull::None };
        Ok(Input::new(self.take(spec.pin)?, pull))
    }

    /// Take a pin and configure it as an output at its inactive level
    pub fn output(&mut self, spec: PinSpec) -> Result<Output<'static>, PinError> {
        let initial = if spec.inverted { Level::High } else { Level::Low };
        Ok(Output::new(self.take(spec.pin)?, initial))
    }
}
