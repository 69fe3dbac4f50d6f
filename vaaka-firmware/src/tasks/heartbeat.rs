//! On-board heartbeat LED
//!
//! Also reports the published sequence state once per period.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};
use vaaka_core::sequence::SequenceState;

use crate::channels::SEQUENCE_STATE;

/// Toggle period in milliseconds
const HEARTBEAT_MS: u64 = 1000;

/// Heartbeat task
#[embassy_executor::task]
pub async fn heartbeat_task(mut led: Output<'static>) {
    let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_MS));

    loop {
        led.toggle();

        match SequenceState::from_code(SEQUENCE_STATE.load(Ordering::Acquire)) {
            Ok(state) => trace!("Heartbeat, state {}", state.name()),
            Err(e) => error!("Published state undecodable: {}", e),
        }

        ticker.next().await;
    }
}
