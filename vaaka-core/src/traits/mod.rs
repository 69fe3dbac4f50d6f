//! Component traits
//!
//! These traits define the interface between the sequencing logic
//! and the concrete components in `vaaka-drivers` (or test doubles).

pub mod actuator;
pub mod control;
pub mod indicator;
pub mod sensor;
pub mod telemetry;

pub use actuator::{ConveyorDrive, Direction, LiftDrive, Setpoint};
pub use control::StartStopInput;
pub use indicator::StatusIndicator;
pub use sensor::{AnalogInput, AxisInput, DigitalInput};
pub use telemetry::TelemetrySink;
