//! Sequence state graph
//!
//! The graph is fixed: every state has exactly one successor, and the
//! only other edge is the global abort back to [`SequenceState::Idle`].

use crate::fault::ConfigError;

/// Sequence states
///
/// The numeric codes are stable and used when the state is published to
/// other tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceState {
    /// Waiting for the latch
    #[default]
    Idle,
    /// Run requested, running indicator on
    Start,
    /// Conveyor clockwise until the start station
    MoveToStart,
    /// Conveyor counter-clockwise until a middle station
    ToMiddleA,
    /// Weighing on the outbound leg
    WeighUp,
    /// Conveyor counter-clockwise until the end station, then dwell
    ToEnd,
    /// Conveyor clockwise until a middle station
    ToMiddleB,
    /// Weighing on the return leg
    WeighDown,
    /// Conveyor clockwise until the start station
    ReturnStart,
    /// Cycle finished
    SequenceDone,
}

impl SequenceState {
    /// Every state, in cycle order
    pub const ALL: [SequenceState; 10] = [
        SequenceState::Idle,
        SequenceState::Start,
        SequenceState::MoveToStart,
        SequenceState::ToMiddleA,
        SequenceState::WeighUp,
        SequenceState::ToEnd,
        SequenceState::ToMiddleB,
        SequenceState::WeighDown,
        SequenceState::ReturnStart,
        SequenceState::SequenceDone,
    ];

    /// Stable numeric code
    pub const fn code(self) -> u8 {
        match self {
            SequenceState::Idle => 0,
            SequenceState::Start => 10,
            SequenceState::MoveToStart => 23,
            SequenceState::ToMiddleA => 31,
            SequenceState::WeighUp => 32,
            SequenceState::ToEnd => 34,
            SequenceState::ToMiddleB => 35,
            SequenceState::WeighDown => 36,
            SequenceState::ReturnStart => 38,
            SequenceState::SequenceDone => 39,
        }
    }

    /// Decode a published state code
    pub fn from_code(code: u8) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.code() == code)
            .ok_or(ConfigError::UnknownState(code))
    }

    /// Successor when the state's guard is satisfied
    pub fn next(self) -> Self {
        use SequenceState::*;

        match self {
            Idle => Start,
            Start => MoveToStart,
            MoveToStart => ToMiddleA,
            ToMiddleA => WeighUp,
            WeighUp => ToEnd,
            ToEnd => ToMiddleB,
            ToMiddleB => WeighDown,
            WeighDown => ReturnStart,
            ReturnStart => SequenceDone,
            // The product is back at the start station; skip MoveToStart
            SequenceDone => ToMiddleA,
        }
    }

    /// Check if the conveyor may be moving in this state
    pub fn drives_conveyor(self) -> bool {
        use SequenceState::*;
        matches!(self, MoveToStart | ToMiddleA | ToEnd | ToMiddleB | ReturnStart)
    }

    /// Check if this is a weighing state
    pub fn is_weighing(self) -> bool {
        matches!(self, SequenceState::WeighUp | SequenceState::WeighDown)
    }

    /// Short name for logs
    pub fn name(self) -> &'static str {
        match self {
            SequenceState::Idle => "idle",
            SequenceState::Start => "start",
            SequenceState::MoveToStart => "move-to-start",
            SequenceState::ToMiddleA => "to-middle-a",
            SequenceState::WeighUp => "weigh-up",
            SequenceState::ToEnd => "to-end",
            SequenceState::ToMiddleB => "to-middle-b",
            SequenceState::WeighDown => "weigh-down",
            SequenceState::ReturnStart => "return-start",
            SequenceState::SequenceDone => "sequence-done",
        }
    }
}
