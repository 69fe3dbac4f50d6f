//! Task-boundary adapters
//!
//! The sequence controller is written against `StartStopInput` and
//! `StatusIndicator`. In the firmware the physical latch lives in the monitor
//! task and the LEDs in the status task, so the controller gets these handles
//! instead.

use core::sync::atomic::Ordering;

use defmt::*;
use vaaka_core::traits::{StartStopInput, StatusIndicator};

use crate::channels::{LatchStatus, StatusCommand, LATCH_STATUS, STATUS_CMD};

/// Read side of the latch published by the monitor task
#[derive(Debug, Default)]
pub struct SharedLatch;

impl SharedLatch {
    fn status(&self) -> LatchStatus {
        LatchStatus::from_u8(LATCH_STATUS.load(Ordering::Acquire))
    }
}

impl StartStopInput for SharedLatch {
    fn both_pressed(&mut self) -> bool {
        self.status() == LatchStatus::BothPressed
    }

    fn check_state(&mut self) -> bool {
        self.is_set()
    }

    fn is_set(&self) -> bool {
        self.status() == LatchStatus::Set
    }
}

/// Sends indicator updates to the status task
#[derive(Debug, Default)]
pub struct StatusHandle;

impl StatusHandle {
    fn send(&self, cmd: StatusCommand) {
        if STATUS_CMD.try_send(cmd).is_err() {
            warn!("Status channel full, dropped {}", cmd);
        }
    }
}

impl StatusIndicator for StatusHandle {
    fn set_running(&mut self, on: bool) {
        self.send(StatusCommand::Running(on));
    }

    fn toggle_running(&mut self) {
        self.send(StatusCommand::ToggleRunning);
    }

    fn signal_fault(&mut self, blink_count: u8) {
        self.send(StatusCommand::Fault(blink_count));
    }
}
