//! Status indicator drivers

mod leds;

pub use leds::{StatusLeds, BLINK_HALF_PERIOD_MS};
