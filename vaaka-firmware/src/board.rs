//! Component construction from the machine configuration
//!
//! Turns the validated configuration and the split peripherals into the
//! drivers each task owns.

use core::cell::RefCell;

use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Input, Output, Pull};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{self, UartTx};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;

use vaaka_core::config::{MachineConfig, PinConfig, PinSpec};
use vaaka_core::fault::ConfigError;
use vaaka_core::sequence::{Hardware, MachineParts, SequenceController, Stations};
use vaaka_drivers::actuator::{BidirectionalMotor, PositionActuator};
use vaaka_drivers::indicator::StatusLeds;
use vaaka_drivers::input::StartStopLatch;
use vaaka_drivers::sensor::{Accelerometer, AnalogSensor, DigitalSensor};
use vaaka_drivers::telemetry::CsvLogger;
use vaaka_hal_rp2040::{
    AdcChannel, BoardPeripherals, PinBank, PinError, SerialWriter, ServoPwm, SharedAdc,
};

use crate::shared::{SharedLatch, StatusHandle};

/// Telemetry UART baud rate
const TELEMETRY_BAUD: u32 = 115_200;

static ADC: StaticCell<SharedAdc> = StaticCell::new();

/// Concrete component types on the RP2040 board
pub struct Board;

impl Hardware for Board {
    type Station = DigitalSensor<Input<'static>>;
    type Conveyor = BidirectionalMotor<Output<'static>>;
    type Lift = PositionActuator<ServoPwm, Delay>;
    type Latch = SharedLatch;
    type Scale = AnalogSensor<AdcChannel>;
    type Vibration = Accelerometer<AdcChannel>;
}

/// Controller as run by the sequence task
pub type Controller = SequenceController<Board, CsvLogger<SerialWriter>, StatusHandle>;

/// Physical latch owned by the monitor task
pub type Latch = StartStopLatch<Input<'static>>;

/// LEDs owned by the status task
pub type Leds = StatusLeds<Output<'static>>;

/// Running and error LEDs
pub fn status_leds(bank: &mut PinBank, pins: &PinConfig) -> Result<Leds, PinError> {
    Ok(StatusLeds::new(
        bank.output(pins.running_led)?,
        bank.output(pins.error_led)?,
        pins.running_led.inverted,
    ))
}

/// On-board heartbeat LED
pub fn heartbeat_led(bank: &mut PinBank, pins: &PinConfig) -> Result<Output<'static>, PinError> {
    bank.output(pins.heartbeat_led)
}

/// Physical start/stop buttons
pub fn start_stop_latch(bank: &mut PinBank, config: &MachineConfig) -> Result<Latch, PinError> {
    let pins = &config.pins;
    let mut latch = StartStopLatch::new(
        bank.input(pins.latch_start)?,
        bank.input(pins.latch_stop)?,
        pins.latch_start.inverted,
        &config.latch,
    );
    latch.set_label("start/stop");
    Ok(latch)
}

fn station(
    bank: &mut PinBank,
    spec: PinSpec,
    name: &str,
) -> Result<DigitalSensor<Input<'static>>, PinError> {
    let mut sensor = DigitalSensor::new(bank.input(spec)?, spec.inverted);
    sensor.set_label(name);
    Ok(sensor)
}

/// Build the sequence controller and everything it owns
///
/// Must be called once: the shared ADC lives in a static cell.
pub fn controller(
    bank: &mut PinBank,
    board: BoardPeripherals,
    config: &MachineConfig,
) -> Result<Controller, ConfigError> {
    let pins = &config.pins;
    let names = &config.stations;

    let stations = Stations {
        start: station(bank, pins.station_start, &names.start)?,
        mid_a: station(bank, pins.station_mid_a, &names.mid_a)?,
        mid_b: station(bank, pins.station_mid_b, &names.mid_b)?,
        end: station(bank, pins.station_end, &names.end)?,
    };

    let mut conveyor = BidirectionalMotor::new(
        bank.output(pins.conveyor_cw)?,
        bank.output(pins.conveyor_ccw)?,
        pins.conveyor_cw.inverted,
    );
    conveyor.set_label("conveyor");

    let pwm = Pwm::new_output_a(board.lift_slice, board.lift_pin, pwm::Config::default());
    let mut lift = PositionActuator::new(ServoPwm::new(pwm), Delay, &config.lift)?;
    lift.set_label("lift");
    lift.set_verbose(true);

    let adc: &'static SharedAdc = ADC.init(Mutex::new(RefCell::new(Adc::new_blocking(
        board.adc,
        adc::Config::default(),
    ))));
    let channel = |pin| AdcChannel::new(adc, pin);

    let mut scale = AnalogSensor::new(
        channel(Channel::new_pin(board.force_pin, Pull::None)),
        &config.analog,
    )?;
    scale.set_label("Force");

    let vibration = Accelerometer::new(
        Some(channel(Channel::new_pin(board.accel_x_pin, Pull::None))),
        Some(channel(Channel::new_pin(board.accel_y_pin, Pull::None))),
        None,
        &config.analog,
    )?;

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = TELEMETRY_BAUD;
    let tx = UartTx::new_blocking(board.telemetry_uart, board.telemetry_pin, uart_config);
    let telemetry = CsvLogger::new(SerialWriter::new(tx), &config.telemetry)?;

    let parts = MachineParts {
        stations,
        conveyor,
        lift,
        latch: SharedLatch,
        scale,
        vibration,
    };

    SequenceController::new(parts, telemetry, StatusHandle, config.sequence)
}
