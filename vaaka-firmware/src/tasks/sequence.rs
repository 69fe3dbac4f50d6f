//! Sequence task
//!
//! Owns the controller and ticks it every `tick_ms`. A latch change from the
//! monitor task wakes it early, so an abort lands within one monitor period.
//! After a fault the task parks: there is no automatic restart.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::select;
use embassy_time::{Duration, Instant, Ticker, Timer};
use vaaka_core::config::StationConfig;
use vaaka_core::fault::Fault;
use vaaka_core::sequence::{SequenceEvent, SequenceState};

use crate::board::Controller;
use crate::channels::{LATCH_CHANGED, SEQUENCE_STATE};

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

fn log_event(event: SequenceEvent) {
    match event {
        SequenceEvent::Transition { from, to } => {
            debug!("{} ({}) -> {} ({})", from.name(), from.code(), to.name(), to.code())
        }
        SequenceEvent::Weighed(result) => {
            info!("Weighed on {} leg: {}", result.leg, result.force)
        }
        SequenceEvent::CycleComplete { cycles } => info!("Cycle {} complete", cycles),
        SequenceEvent::Aborted { from } => warn!("Sequence aborted in {}", from.name()),
    }
}

async fn park(fault: Fault, state: SequenceState) -> ! {
    error!("Sequence halted in {}: {}", state.name(), fault);
    SEQUENCE_STATE.store(state.code(), Ordering::Release);
    loop {
        Timer::after_secs(60).await;
    }
}

/// Sequence task
#[embassy_executor::task]
pub async fn sequence_task(mut controller: Controller, stations: StationConfig) {
    info!("Sequence task started");

    if let Err(fault) = controller.setup(now_ms(), &stations) {
        controller.handle_fault(fault);
        park(fault, controller.state()).await;
    }

    let tick = Duration::from_millis(controller.config().tick_ms as u64);
    let mut ticker = Ticker::every(tick);

    loop {
        match controller.tick(now_ms()) {
            Ok(Some(event)) => log_event(event),
            Ok(None) => {}
            Err(fault) => park(fault, controller.state()).await,
        }
        SEQUENCE_STATE.store(controller.state().code(), Ordering::Release);

        select(ticker.next(), LATCH_CHANGED.wait()).await;
    }
}
