//! Sensor traits

/// Binary presence/contact sensor
///
/// Implementations apply the configured polarity, so `true` always means
/// "object present" / "contact made" regardless of wiring.
pub trait DigitalInput {
    /// Read the current logical state
    fn read(&mut self) -> bool;

    /// Read, compare against the stored sample, and store the new sample
    ///
    /// Returns `true` if the logical state differs from the previous sample.
    fn changed(&mut self) -> bool;

    /// The last stored sample, without touching hardware
    fn state(&self) -> bool;
}

/// Single-channel analog sensor (force, strain, ...)
pub trait AnalogInput {
    /// Read the current value (raw or simplified, depending on configuration)
    fn read(&mut self) -> f32;

    /// Read, store the new baseline, and return the delta from the previous read
    fn update(&mut self) -> f32;
}

/// Three-axis analog sensor (accelerometer)
///
/// Unused axes always read as zero.
pub trait AxisInput {
    /// Read all three axes
    fn read_axes(&mut self) -> [f32; 3];

    /// Read all three axes and return the per-axis delta from the previous read
    fn update_axes(&mut self) -> [f32; 3];
}
