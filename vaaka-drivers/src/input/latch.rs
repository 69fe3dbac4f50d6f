//! Start/stop button latch
//!
//! Samples two buttons, filters them and feeds the result to
//! [`LatchLogic`]. One poll is [`StartStopInput::both_pressed`] followed by
//! [`StartStopInput::check_state`]; the pair shares a single sample, so
//! `debounce_samples` counts polls. `check_state` on its own samples fresh.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use heapless::String;
use vaaka_core::config::{label, LatchConfig, MAX_LABEL_LEN};
use vaaka_core::latch::{Debounce, LatchLogic, LatchState};
use vaaka_core::traits::StartStopInput;

/// Physical two-button latch
pub struct StartStopLatch<P> {
    start: P,
    stop: P,
    inverted: bool,
    start_filter: Debounce,
    stop_filter: Debounce,
    logic: LatchLogic,
    /// Sample taken by `both_pressed`, consumed by the next `check_state`
    pending: Option<(bool, bool)>,
    label: String<MAX_LABEL_LEN>,
    verbose: bool,
}

impl<P: InputPin<Error = Infallible>> StartStopLatch<P> {
    /// Create a new latch in Reset
    ///
    /// `inverted` applies to both buttons (pressed = pin low).
    pub fn new(start: P, stop: P, inverted: bool, config: &LatchConfig) -> Self {
        Self {
            start,
            stop,
            inverted,
            start_filter: Debounce::new(config.debounce_samples),
            stop_filter: Debounce::new(config.debounce_samples),
            logic: LatchLogic::new(),
            pending: None,
            label: String::new(),
            verbose: false,
        }
    }

    /// Set the name used in diagnostics
    pub fn set_label(&mut self, name: &str) {
        self.label = label(name);
    }

    /// Enable or disable transition diagnostics
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if diagnostics are enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Current latch state
    pub fn state(&self) -> LatchState {
        self.logic.state()
    }

    /// Sample both buttons through their filters
    fn sample(&mut self) -> (bool, bool) {
        let start = self.start.is_high().unwrap_or_else(|e| match e {}) != self.inverted;
        let stop = self.stop.is_high().unwrap_or_else(|e| match e {}) != self.inverted;
        (
            self.start_filter.sample(start),
            self.stop_filter.sample(stop),
        )
    }
}

impl<P: InputPin<Error = Infallible>> StartStopInput for StartStopLatch<P> {
    fn both_pressed(&mut self) -> bool {
        let (start, stop) = self.sample();
        self.pending = Some((start, stop));
        LatchLogic::both_pressed(start, stop)
    }

    fn check_state(&mut self) -> bool {
        let (start, stop) = match self.pending.take() {
            Some(sampled) => sampled,
            None => self.sample(),
        };
        let before = self.logic.state();
        let after = self.logic.evaluate(start, stop);

        #[cfg(feature = "defmt")]
        if self.verbose && before != after {
            defmt::debug!("{}: {} -> {}", self.label.as_str(), before, after);
        }
        #[cfg(not(feature = "defmt"))]
        let _ = before;

        after.is_set()
    }

    fn is_set(&self) -> bool {
        self.logic.state().is_set()
    }
}
