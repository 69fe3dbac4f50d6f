//! Actuator drivers

mod lift;
mod motor;

pub use lift::PositionActuator;
pub use motor::BidirectionalMotor;
