//! Start/stop monitor task
//!
//! Polls the physical buttons and publishes the latch status for the
//! sequence task. A simultaneous press is published as `BothPressed` and
//! stays published: the fault is fatal and only a power cycle clears it.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_time::{Duration, Ticker};
use vaaka_core::traits::StartStopInput;

use crate::board::Latch;
use crate::channels::{LatchStatus, LATCH_CHANGED, LATCH_STATUS};

/// Monitor task
#[embassy_executor::task]
pub async fn monitor_task(mut latch: Latch, period_ms: u32) {
    info!("Monitor task started ({}ms)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms.max(1) as u64));
    let mut published = LatchStatus::Reset;

    loop {
        let status = if published == LatchStatus::BothPressed || latch.both_pressed() {
            LatchStatus::BothPressed
        } else if latch.check_state() {
            LatchStatus::Set
        } else {
            LatchStatus::Reset
        };

        if status != published {
            match status {
                LatchStatus::BothPressed => error!("Start and stop pressed together"),
                _ => debug!("Latch {} -> {}", published, status),
            }
            published = status;
            LATCH_STATUS.store(status as u8, Ordering::Release);
            LATCH_CHANGED.signal(());
        }

        ticker.next().await;
    }
}
