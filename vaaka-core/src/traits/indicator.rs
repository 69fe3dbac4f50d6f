//! Status indicator trait

/// Running/error status sink
///
/// Implementations must not block: fault blinking is driven elsewhere
/// (a timer poll or a dedicated task).
pub trait StatusIndicator {
    /// Turn the running indicator on or off
    fn set_running(&mut self, on: bool);

    /// Toggle the running indicator (idle heartbeat)
    fn toggle_running(&mut self);

    /// Signal a fault by blinking the error indicator
    ///
    /// `blink_count` of 0 blinks until power cycle.
    fn signal_fault(&mut self, blink_count: u8);
}
