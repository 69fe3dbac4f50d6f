//! Inter-task communication
//!
//! Each shared value has exactly one writer:
//! - `LATCH_STATUS` is written only by the monitor task
//! - `SEQUENCE_STATE` is written only by the sequence task
//! - `STATUS_CMD` is fed by the sequence task (through its indicator handle)
//!   and drained by the status task

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU8;

/// Channel capacity for status LED commands
const STATUS_CHANNEL_SIZE: usize = 8;

/// Latch status as published by the monitor task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum LatchStatus {
    /// Not running
    Reset = 0,
    /// Run requested
    Set = 1,
    /// Start and stop pressed together
    BothPressed = 2,
}

impl LatchStatus {
    /// Decode a published value; anything unknown reads as Reset
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => LatchStatus::Set,
            2 => LatchStatus::BothPressed,
            _ => LatchStatus::Reset,
        }
    }
}

/// Commands for the status LED task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum StatusCommand {
    /// Running LED on/off
    Running(bool),
    /// Toggle the running LED
    ToggleRunning,
    /// Blink the error LED (0 = until power cycle)
    Fault(u8),
}

/// Current latch status (`LatchStatus as u8`)
pub static LATCH_STATUS: AtomicU8 = AtomicU8::new(LatchStatus::Reset as u8);

/// Current sequence state code
pub static SEQUENCE_STATE: AtomicU8 = AtomicU8::new(0);

/// Signal that the latch status changed (wakes the sequence task early)
pub static LATCH_CHANGED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Status LED commands
pub static STATUS_CMD: Channel<CriticalSectionRawMutex, StatusCommand, STATUS_CHANNEL_SIZE> =
    Channel::new();
