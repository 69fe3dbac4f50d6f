//! Sequencing
//!
//! The state graph and the tick-driven controller that walks it.

pub mod controller;
pub mod events;
pub mod state;

pub use controller::{Hardware, MachineParts, SequenceController, Stations};
pub use events::{Leg, SequenceEvent, WeighResult};
pub use state::SequenceState;
