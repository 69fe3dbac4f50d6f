//! Status LED task
//!
//! Applies indicator commands from the sequence task and advances the
//! fault blink.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
use vaaka_core::traits::StatusIndicator;

use crate::board::Leds;
use crate::channels::{StatusCommand, STATUS_CMD};

/// Blink poll period in milliseconds
const POLL_MS: u64 = 50;

/// Status task
#[embassy_executor::task]
pub async fn status_task(mut leds: Leds) {
    info!("Status task started");

    loop {
        if let Either::First(cmd) = select(STATUS_CMD.receive(), Timer::after_millis(POLL_MS)).await
        {
            match cmd {
                StatusCommand::Running(on) => leds.set_running(on),
                StatusCommand::ToggleRunning => leds.toggle_running(),
                StatusCommand::Fault(count) => {
                    warn!("Fault indicated ({} blinks, 0 = until power cycle)", count);
                    leds.signal_fault(count);
                }
            }
        }

        leds.poll(Instant::now().as_millis() as u32);
    }
}
