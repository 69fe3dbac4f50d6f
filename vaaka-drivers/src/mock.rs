//! Test doubles for pins, PWM, delays and ADC channels
//!
//! State lives behind `Rc<Cell<_>>` so a test can keep a handle after
//! moving the mock into a driver.

extern crate std;

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::sensor::AnalogSource;

/// Input pin with a settable level
#[derive(Clone, Default)]
pub struct MockInput {
    high: Rc<Cell<bool>>,
}

impl MockInput {
    pub fn new(high: bool) -> Self {
        Self {
            high: Rc::new(Cell::new(high)),
        }
    }

    pub fn set(&self, high: bool) {
        self.high.set(high);
    }
}

impl digital::ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

/// Output pin that records every level written
#[derive(Clone, Default)]
pub struct MockOutput {
    high: Rc<Cell<bool>>,
    writes: Rc<RefCell<Vec<bool>>>,
}

impl MockOutput {
    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.borrow().clone()
    }

    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }

    fn write(&self, high: bool) {
        self.high.set(high);
        self.writes.borrow_mut().push(high);
    }
}

impl digital::ErrorType for MockOutput {
    type Error = Infallible;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.write(true);
        Ok(())
    }
}

/// PWM channel that records every duty written
#[derive(Clone, Default)]
pub struct MockPwm {
    duties: Rc<RefCell<Vec<u16>>>,
}

impl MockPwm {
    pub fn duties(&self) -> Vec<u16> {
        self.duties.borrow().clone()
    }

    pub fn clear(&self) {
        self.duties.borrow_mut().clear();
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duties.borrow_mut().push(duty);
        Ok(())
    }
}

/// Delay that returns immediately and sums the requested time
#[derive(Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns.get() / 1000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
    }
}

/// ADC channel with a settable raw value
#[derive(Clone, Default)]
pub struct MockAdc {
    raw: Rc<Cell<u16>>,
}

impl MockAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw: Rc::new(Cell::new(raw)),
        }
    }

    pub fn set(&self, raw: u16) {
        self.raw.set(raw);
    }
}

impl AnalogSource for MockAdc {
    fn read_raw(&mut self) -> u16 {
        self.raw.get()
    }
}
