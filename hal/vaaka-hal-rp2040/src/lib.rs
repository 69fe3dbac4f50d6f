//! RP2040 board glue for the weighing station firmware
//!
//! Binds the board-agnostic drivers to RP2040 peripherals:
//!
//! - Config-driven GPIO allocation with board-reserved pins held back
//! - Shared ADC with one handle per analog channel
//! - 50 Hz servo PWM for the lift actuator
//! - Blocking UART transmitter for telemetry rows

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod pins;
pub mod pwm;
pub mod serial;

pub use adc::{AdcChannel, SharedAdc};
pub use pins::{BoardPeripherals, PinBank, PinError};
pub use pwm::ServoPwm;
pub use serial::SerialWriter;
