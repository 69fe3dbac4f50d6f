//! Component drivers
//!
//! This crate provides concrete implementations of the traits defined
//! in vaaka-core, built on `embedded-hal` 1.0 pins, PWM and delays:
//!
//! - Sensors (digital presence, analog force, three-axis accelerometer)
//! - Actuators (relay-pair conveyor motor, servo lift)
//! - Start/stop button latch
//! - CSV telemetry over any `embedded-io` writer
//! - Running/error status LEDs

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod indicator;
pub mod input;
pub mod sensor;
pub mod telemetry;

#[cfg(test)]
mod mock;
