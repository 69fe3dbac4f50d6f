//! Vaaka - Conveyor Weighing Station Firmware
//!
//! Main firmware binary for RP2040-based weighing rigs. The machine
//! configuration is compiled in from `machine.toml`; pins, timing and the
//! telemetry layout all come from there.
//!
//! Tasks:
//! - sequence: owns the controller, ticks the state machine
//! - monitor: owns the start/stop buttons, publishes the latch
//! - status: owns the running/error LEDs
//! - heartbeat: on-board LED

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Timer;
use vaaka_core::config::{MachineConfig, PinConfig};
use vaaka_core::fault::ConfigError;
use vaaka_hal_rp2040::{BoardPeripherals, PinBank};
use {defmt_rtt as _, panic_probe as _};

mod board;
mod channels;
mod config;
mod shared;
mod tasks;

use crate::channels::{StatusCommand, STATUS_CMD};

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Vaaka firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, fixed) = PinBank::split(p);
    info!("Peripherals initialized");

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration fault: {}", e);
            // LEDs from the default wiring, the configured ones are unknown
            halt(spawner, &mut bank, &PinConfig::default(), e).await
        }
    };

    match board::heartbeat_led(&mut bank, &config.pins) {
        Ok(led) => spawn(spawner, tasks::heartbeat_task(led)),
        Err(e) => warn!("No heartbeat LED: {}", e),
    }

    let leds = match board::status_leds(&mut bank, &config.pins) {
        Ok(leds) => leds,
        Err(e) => {
            // Without indicator LEDs the only report is the log
            error!("Status LEDs unavailable: {}", e);
            park().await
        }
    };
    spawn(spawner, tasks::status_task(leds));

    if let Err(e) = start_sequencing(spawner, &mut bank, fixed, &config) {
        error!("Configuration fault: {}", e);
        signal_fault();
        park().await;
    }

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Build the latch and controller and spawn the tasks that own them
fn start_sequencing(
    spawner: Spawner,
    bank: &mut PinBank,
    fixed: BoardPeripherals,
    config: &MachineConfig,
) -> Result<(), ConfigError> {
    let latch = board::start_stop_latch(bank, config)?;
    let controller = board::controller(bank, fixed, config)?;

    spawn(spawner, tasks::monitor_task(latch, config.latch.monitor_ms));
    spawn(
        spawner,
        tasks::sequence_task(controller, config.stations.clone()),
    );
    Ok(())
}

fn spawn<S>(spawner: Spawner, token: embassy_executor::SpawnToken<S>) {
    if spawner.spawn(token).is_err() {
        error!("Task pool exhausted");
    }
}

fn signal_fault() {
    let _ = STATUS_CMD.try_send(StatusCommand::Fault(0));
}

/// Blink the error LED forever after a configuration fault
async fn halt(spawner: Spawner, bank: &mut PinBank, pins: &PinConfig, e: ConfigError) -> ! {
    match board::status_leds(bank, pins) {
        Ok(leds) => {
            spawn(spawner, tasks::status_task(leds));
            signal_fault();
        }
        Err(pin) => error!("Cannot indicate {}: {}", e, pin),
    }
    park().await
}

async fn park() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}
