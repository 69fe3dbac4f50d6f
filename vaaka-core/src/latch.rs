//! Start/stop latch logic
//!
//! A Mealy-style flip-flop driven by two operator buttons:
//!
//! - Reset → Set on a start press edge while stop is released
//! - Set → Reset whenever stop is pressed (stop dominates, start may stay held)
//! - Both pressed at once is not a latch transition at all; it is reported
//!   separately so callers can raise a safety fault before evaluating the latch
//!
//! Holding start after a stop does not re-arm the latch: start must be
//! released and pressed again.

/// Latch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchState {
    /// Not running
    #[default]
    Reset,
    /// Run requested
    Set,
}

impl LatchState {
    /// Check if the latch is set
    pub fn is_set(self) -> bool {
        self == LatchState::Set
    }
}

/// Consecutive-sample input filter
///
/// The filtered level only follows the raw input after `threshold`
/// consecutive samples disagree with the current filtered level.
/// A threshold of 1 passes samples straight through.
#[derive(Debug, Clone)]
pub struct Debounce {
    threshold: u8,
    count: u8,
    level: bool,
}

impl Debounce {
    /// Create a new filter, starting released
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.max(1),
            count: 0,
            level: false,
        }
    }

    /// Feed one raw sample and return the filtered level
    pub fn sample(&mut self, raw: bool) -> bool {
        if raw == self.level {
            self.count = 0;
        } else {
            self.count = self.count.saturating_add(1);
            if self.count >= self.threshold {
                self.level = raw;
                self.count = 0;
            }
        }
        self.level
    }

    /// Current filtered level
    pub fn level(&self) -> bool {
        self.level
    }
}

/// Latch transition logic, independent of pins
#[derive(Debug, Clone)]
pub struct LatchLogic {
    state: LatchState,
    /// Start level on the previous evaluation (for edge detection)
    start_was_pressed: bool,
}

impl Default for LatchLogic {
    fn default() -> Self {
        Self::new()
    }
}

impl LatchLogic {
    /// Create a new latch in the Reset state
    pub fn new() -> Self {
        Self {
            state: LatchState::Reset,
            start_was_pressed: false,
        }
    }

    /// Check for the simultaneous-press fault condition
    pub fn both_pressed(start: bool, stop: bool) -> bool {
        start && stop
    }

    /// Evaluate one sample pair and return the updated state
    pub fn evaluate(&mut self, start: bool, stop: bool) -> LatchState {
        let start_edge = start && !self.start_was_pressed;
        self.start_was_pressed = start;

        self.state = match self.state {
            LatchState::Reset if start_edge && !stop => LatchState::Set,
            LatchState::Set if stop => LatchState::Reset,
            unchanged => unchanged,
        };
        self.state
    }

    /// Current state
    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Force the latch back to Reset
    pub fn reset(&mut self) {
        self.state = LatchState::Reset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_start_sets_latch() {
        let mut latch = LatchLogic::new();
        assert_eq!(latch.evaluate(false, false), LatchState::Reset);
        assert_eq!(latch.evaluate(true, false), LatchState::Set);
        // Releasing start keeps it set
        assert_eq!(latch.evaluate(false, false), LatchState::Set);
    }

    #[test]
    fn test_stop_resets_with_start_held() {
        let mut latch = LatchLogic::new();
        latch.evaluate(true, false);
        assert!(latch.state().is_set());

        // Stop while start is still held
        assert_eq!(latch.evaluate(true, true), LatchState::Reset);
        // Stop released, start still held: no re-arm on held state
        assert_eq!(latch.evaluate(true, false), LatchState::Reset);
        // Release and press again
        latch.evaluate(false, false);
        assert_eq!(latch.evaluate(true, false), LatchState::Set);
    }

    #[test]
    fn test_stop_only_resets() {
        let mut latch = LatchLogic::new();
        latch.evaluate(true, false);
        latch.evaluate(false, false);
        assert_eq!(latch.evaluate(false, true), LatchState::Reset);
        assert_eq!(latch.evaluate(false, false), LatchState::Reset);
    }

    #[test]
    fn test_start_ignored_while_stop_pressed() {
        let mut latch = LatchLogic::new();
        assert_eq!(latch.evaluate(true, true), LatchState::Reset);
    }

    #[test]
    fn test_debounce_passthrough() {
        let mut d = Debounce::new(1);
        assert!(d.sample(true));
        assert!(!d.sample(false));
    }

    #[test]
    fn test_debounce_requires_consecutive_samples() {
        let mut d = Debounce::new(3);
        assert!(!d.sample(true));
        assert!(!d.sample(true));
        // Glitch resets the count
        assert!(!d.sample(false));
        assert!(!d.sample(true));
        assert!(!d.sample(true));
        assert!(d.sample(true));
        assert!(d.level());
    }

    proptest! {
        #[test]
        fn prop_both_pressed_independent_of_state(
            history in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..32)
        ) {
            let mut latch = LatchLogic::new();
            for (start, stop) in history {
                latch.evaluate(start, stop);
            }
            prop_assert!(LatchLogic::both_pressed(true, true));
            prop_assert!(!LatchLogic::both_pressed(true, false));
            prop_assert!(!LatchLogic::both_pressed(false, true));
        }

        #[test]
        fn prop_stop_always_wins(
            history in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..32),
            start in any::<bool>(),
        ) {
            let mut latch = LatchLogic::new();
            for (s, p) in history {
                latch.evaluate(s, p);
            }
            prop_assert_eq!(latch.evaluate(start, true), LatchState::Reset);
        }
    }
}
