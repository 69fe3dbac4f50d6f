//! Operator control traits

/// Two-button start/stop latch
///
/// Callers must check [`StartStopInput::both_pressed`] before relying on
/// [`StartStopInput::check_state`], and treat a `true` result as a safety
/// fault requiring an immediate halt.
pub trait StartStopInput {
    /// True if start and stop both read pressed, independent of latch state
    fn both_pressed(&mut self) -> bool;

    /// Evaluate the latch and return the (possibly just updated) state
    ///
    /// `true` means Set (run requested).
    fn check_state(&mut self) -> bool;

    /// Current latch state without sampling the inputs
    fn is_set(&self) -> bool;
}
