//! Sensor drivers

mod accelerometer;
mod analog;
mod digital;

pub use accelerometer::Accelerometer;
pub use analog::AnalogSensor;
pub use digital::DigitalSensor;

/// One ADC channel
///
/// Kept separate from `embedded-hal`, which has no blocking ADC trait.
pub trait AnalogSource {
    /// Read the raw conversion result
    fn read_raw(&mut self) -> u16;
}
