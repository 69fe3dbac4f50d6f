//! Board-agnostic core logic for the weighing station firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Component traits (station sensors, conveyor, lift, latch, telemetry, status)
//! - Start/stop latch logic with simultaneous-press detection
//! - Analog scaling and rounding
//! - Telemetry rate limiting and record layout
//! - Fault taxonomy
//! - Sequence state graph and the sequencing controller
//! - Configuration type definitions and validation

#![no_std]
#![deny(unsafe_code)]

pub mod analog;
pub mod config;
pub mod fault;
pub mod latch;
pub mod sequence;
pub mod telemetry;
pub mod traits;
