//! Three-axis analog accelerometer
//!
//! Each axis is an independent ADC channel. Boards rarely have three free
//! ADC inputs, so any axis may be left unwired; unwired axes read zero.

use vaaka_core::config::AnalogConfig;
use vaaka_core::fault::ConfigError;
use vaaka_core::traits::{AnalogInput, AxisInput};

use super::{AnalogSensor, AnalogSource};

/// Accelerometer with up to three wired axes
pub struct Accelerometer<A> {
    axes: [Option<AnalogSensor<A>>; 3],
}

impl<A: AnalogSource> Accelerometer<A> {
    /// Create from optional x/y/z channels
    ///
    /// At least one axis must be wired.
    pub fn new(
        x: Option<A>,
        y: Option<A>,
        z: Option<A>,
        config: &AnalogConfig,
    ) -> Result<Self, ConfigError> {
        if x.is_none() && y.is_none() && z.is_none() {
            return Err(ConfigError::NoAxesWired);
        }
        let wrap = |source: Option<A>| source.map(|s| AnalogSensor::new(s, config)).transpose();
        Ok(Self {
            axes: [wrap(x)?, wrap(y)?, wrap(z)?],
        })
    }

    /// Check which axes are wired
    pub fn wired(&self) -> [bool; 3] {
        [
            self.axes[0].is_some(),
            self.axes[1].is_some(),
            self.axes[2].is_some(),
        ]
    }

    /// Set the drift tolerance on every wired axis
    pub fn set_tolerance(&mut self, tolerance: f32) {
        for axis in self.axes.iter_mut().flatten() {
            axis.set_tolerance(tolerance);
        }
    }

    /// Check if any wired axis drifted above tolerance on the last update
    pub fn exceeds_tolerance(&self) -> bool {
        self.axes.iter().flatten().any(|a| a.exceeds_tolerance())
    }

    fn each(&mut self, f: impl Fn(&mut AnalogSensor<A>) -> f32) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (slot, axis) in out.iter_mut().zip(self.axes.iter_mut()) {
            if let Some(axis) = axis {
                *slot = f(axis);
            }
        }
        out
    }
}

impl<A: AnalogSource> AxisInput for Accelerometer<A> {
    fn read_axes(&mut self) -> [f32; 3] {
        self.each(|a| a.read())
    }

    fn update_axes(&mut self) -> [f32; 3] {
        self.each(|a| a.update())
    }
}
