//! Events reported by the sequence controller

use super::state::SequenceState;

/// Half of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Leg {
    /// Start station towards end station
    Outbound,
    /// End station back towards start station
    Return,
}

/// Force sampled at the end of a hold phase
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeighResult {
    /// Which leg the product was weighed on
    pub leg: Leg,
    /// Force sensor reading
    pub force: f32,
}

/// Something observable happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceEvent {
    /// Moved along the sequence graph
    Transition {
        /// Previous state
        from: SequenceState,
        /// New state
        to: SequenceState,
    },
    /// A weighing finished its hold phase
    Weighed(WeighResult),
    /// A full cycle finished
    CycleComplete {
        /// Completed cycles since power-on
        cycles: u32,
    },
    /// The latch was released mid-sequence
    Aborted {
        /// State that was interrupted
        from: SequenceState,
    },
}
