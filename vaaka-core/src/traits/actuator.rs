//! Actuator traits
//!
//! This module defines traits for the two actuator kinds on the machine:
//! - Conveyor motor (relay pair, mutually exclusive directions)
//! - Lift actuator (ramped moves between named setpoints)

use core::fmt;
use core::str::FromStr;

use crate::fault::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (towards the start station)
    Clockwise,
    /// Counter-clockwise rotation (towards the end station)
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Named lift setpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Setpoint {
    /// Lower end of the range
    Min,
    /// `min + (max - min) / 2`
    Mid,
    /// Upper end of the range
    Max,
}

impl Setpoint {
    /// Resolve the setpoint to a raw position within `[min, max]`
    pub fn resolve(self, min: i32, max: i32) -> i32 {
        match self {
            Setpoint::Min => min,
            Setpoint::Mid => min + (max - min) / 2,
            Setpoint::Max => max,
        }
    }

    /// Lowercase name as used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            Setpoint::Min => "min",
            Setpoint::Mid => "mid",
            Setpoint::Max => "max",
        }
    }
}

impl FromStr for Setpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "min" => Ok(Setpoint::Min),
            "mid" => Ok(Setpoint::Mid),
            "max" => Ok(Setpoint::Max),
            _ => Err(ConfigError::InvalidSetpoint),
        }
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conveyor drive with two mutually exclusive direction outputs
///
/// Mutual exclusion is enforced by the implementation, not the caller:
/// every run command first releases both outputs.
pub trait ConveyorDrive {
    /// Run clockwise
    fn run_cw(&mut self);

    /// Run counter-clockwise
    fn run_ccw(&mut self);

    /// Release both outputs unconditionally
    fn stop(&mut self);

    /// Last commanded direction, `None` when stopped
    fn direction(&self) -> Option<Direction>;

    /// Run in the given direction
    fn run(&mut self, dir: Direction) {
        match dir {
            Direction::Clockwise => self.run_cw(),
            Direction::CounterClockwise => self.run_ccw(),
        }
    }

    /// Check if the conveyor is currently commanded to move
    fn is_running(&self) -> bool {
        self.direction().is_some()
    }
}

/// Lift actuator with named setpoints
pub trait LiftDrive {
    /// Ramp to a named setpoint
    ///
    /// No-op if already there. Blocks for the duration of the ramp.
    fn move_to_named(&mut self, pos: Setpoint);

    /// Current raw position
    fn position(&self) -> i32;

    /// Raw position of a named setpoint
    fn setpoint_position(&self, pos: Setpoint) -> i32;

    /// Check if the lift currently rests at the given setpoint
    fn is_at(&self, pos: Setpoint) -> bool {
        self.position() == self.setpoint_position(pos)
    }
}
