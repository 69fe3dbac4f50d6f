//! Sequence controller
//!
//! Walks the state graph one tick at a time. Each tick:
//!
//! 1. Polls every sensor and appends a telemetry record (rate-limited by the sink)
//! 2. Raises a safety fault if start and stop are both pressed
//! 3. Evaluates the latch
//! 4. Aborts to Idle if the latch is no longer set, stopping the conveyor
//!    on the same tick
//! 5. Executes one step of the current state
//!
//! Conveyor moves poll their station sensor once per tick and never time out.
//! Weighing is split into settle/hold/settle phases timed against the tick
//! timestamp; only the lift ramp itself blocks.
//!
//! A fault stops the conveyor, hands the error indicator to the status
//! sink and is latched: every later tick returns it again.

use crate::config::{SequenceConfig, StationConfig};
use crate::fault::{ConfigError, Fault, SafetyFault};
use crate::telemetry::Value;
use crate::traits::{
    AnalogInput, AxisInput, ConveyorDrive, DigitalInput, Direction, LiftDrive, StartStopInput,
    StatusIndicator, TelemetrySink,
};

use super::events::{Leg, SequenceEvent, WeighResult};
use super::state::SequenceState;

/// Column headers appended after the station names
const SENSOR_COLUMNS: [&str; 4] = ["Force", "AccX", "AccY", "AccZ"];

/// Component types the controller is built from
pub trait Hardware {
    /// Station presence sensor
    type Station: DigitalInput;
    /// Conveyor motor
    type Conveyor: ConveyorDrive;
    /// Lift actuator
    type Lift: LiftDrive;
    /// Start/stop latch (physical or shared with a monitor task)
    type Latch: StartStopInput;
    /// Force sensor under the lift
    type Scale: AnalogInput;
    /// Frame vibration sensor
    type Vibration: AxisInput;
}

/// The four station sensors
#[derive(Debug)]
pub struct Stations<S> {
    /// Start station (A1)
    pub start: S,
    /// Middle station on the outbound leg (A2)
    pub mid_a: S,
    /// Middle station on the return leg (B2)
    pub mid_b: S,
    /// End station (B1)
    pub end: S,
}

/// Everything the controller owns
pub struct MachineParts<H: Hardware> {
    /// Station sensors
    pub stations: Stations<H::Station>,
    /// Conveyor motor
    pub conveyor: H::Conveyor,
    /// Lift actuator
    pub lift: H::Lift,
    /// Start/stop latch
    pub latch: H::Latch,
    /// Force sensor
    pub scale: H::Scale,
    /// Vibration sensor
    pub vibration: H::Vibration,
}

/// Progress within the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepPhase {
    /// Nothing done yet in this state
    Entry,
    /// Waiting before raising the lift
    Settling { since: u32 },
    /// Lift raised, product resting on the scale
    Holding { since: u32 },
    /// Lift lowered, waiting before moving on
    Lowering { since: u32 },
    /// Stopped at the end station
    Dwelling { since: u32 },
}

fn elapsed(now_ms: u32, since: u32) -> u32 {
    now_ms.wrapping_sub(since)
}

/// Tick-driven sequencing controller
pub struct SequenceController<H: Hardware, T: TelemetrySink, I: StatusIndicator> {
    parts: MachineParts<H>,
    telemetry: T,
    indicator: I,
    config: SequenceConfig,
    state: SequenceState,
    phase: StepPhase,
    cycles: u32,
    fault: Option<Fault>,
}

impl<H: Hardware, T: TelemetrySink, I: StatusIndicator> SequenceController<H, T, I> {
    /// Create a controller in Idle
    pub fn new(
        parts: MachineParts<H>,
        telemetry: T,
        indicator: I,
        config: SequenceConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            parts,
            telemetry,
            indicator,
            config,
            state: SequenceState::Idle,
            phase: StepPhase::Entry,
            cycles: 0,
            fault: None,
        })
    }

    /// Write the telemetry header: station names followed by the analog columns
    pub fn setup(&mut self, now_ms: u32, stations: &StationConfig) -> Result<(), Fault> {
        let header = [
            stations.start.as_str(),
            stations.mid_a.as_str(),
            stations.mid_b.as_str(),
            stations.end.as_str(),
            SENSOR_COLUMNS[0],
            SENSOR_COLUMNS[1],
            SENSOR_COLUMNS[2],
            SENSOR_COLUMNS[3],
        ];
        self.telemetry.setup(now_ms, &header)?;
        Ok(())
    }

    /// Run one controller iteration
    ///
    /// Any fault is passed to [`SequenceController::handle_fault`] before it
    /// is returned.
    pub fn tick(&mut self, now_ms: u32) -> Result<Option<SequenceEvent>, Fault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        match self.run_tick(now_ms) {
            Ok(event) => Ok(event),
            Err(fault) => {
                self.handle_fault(fault);
                Err(fault)
            }
        }
    }

    /// Stop everything and latch the fault
    ///
    /// There is no automatic restart; a power cycle is required.
    pub fn handle_fault(&mut self, fault: Fault) {
        self.parts.conveyor.stop();
        self.indicator.set_running(false);
        self.indicator.signal_fault(fault.blink_count());
        self.fault = Some(fault);
    }

    fn run_tick(&mut self, now_ms: u32) -> Result<Option<SequenceEvent>, Fault> {
        self.poll_and_log(now_ms)?;

        if self.parts.latch.both_pressed() {
            return Err(SafetyFault::BothPressed.into());
        }

        let latch_set = self.parts.latch.check_state();

        if !latch_set && self.state != SequenceState::Idle {
            let from = self.state;
            self.parts.conveyor.stop();
            self.indicator.set_running(false);
            self.state = SequenceState::Idle;
            self.phase = StepPhase::Entry;
            return Ok(Some(SequenceEvent::Aborted { from }));
        }

        Ok(self.step(now_ms, latch_set))
    }

    fn poll_and_log(&mut self, now_ms: u32) -> Result<(), Fault> {
        let stations = &mut self.parts.stations;
        stations.start.changed();
        stations.mid_a.changed();
        stations.mid_b.changed();
        stations.end.changed();

        let force = self.parts.scale.read();
        let [x, y, z] = self.parts.vibration.read_axes();

        let record = [
            Value::Bool(stations.start.state()),
            Value::Bool(stations.mid_a.state()),
            Value::Bool(stations.mid_b.state()),
            Value::Bool(stations.end.state()),
            Value::Number(force),
            Value::Number(x),
            Value::Number(y),
            Value::Number(z),
        ];
        self.telemetry.append(now_ms, &record)?;
        Ok(())
    }

    fn step(&mut self, now_ms: u32, latch_set: bool) -> Option<SequenceEvent> {
        match self.state {
            SequenceState::Idle => {
                self.indicator.toggle_running();
                latch_set.then(|| self.advance())
            }
            SequenceState::Start => {
                self.indicator.set_running(true);
                self.parts.lift.move_to_named(self.config.rest_setpoint);
                Some(self.advance())
            }
            SequenceState::MoveToStart | SequenceState::ReturnStart => {
                let arrived = self.parts.stations.start.state();
                self.drive_until(Direction::Clockwise, arrived)
                    .then(|| self.advance())
            }
            SequenceState::ToMiddleA => {
                let arrived = self.at_middle();
                self.drive_until(Direction::CounterClockwise, arrived)
                    .then(|| self.advance())
            }
            SequenceState::ToMiddleB => {
                let arrived = self.at_middle();
                self.drive_until(Direction::Clockwise, arrived)
                    .then(|| self.advance())
            }
            SequenceState::WeighUp => self.weigh(now_ms, Leg::Outbound),
            SequenceState::WeighDown => self.weigh(now_ms, Leg::Return),
            SequenceState::ToEnd => self.to_end(now_ms),
            SequenceState::SequenceDone => {
                self.cycles = self.cycles.wrapping_add(1);
                self.advance();
                Some(SequenceEvent::CycleComplete {
                    cycles: self.cycles,
                })
            }
        }
    }

    fn advance(&mut self) -> SequenceEvent {
        let from = self.state;
        self.state = from.next();
        self.phase = StepPhase::Entry;
        SequenceEvent::Transition {
            from,
            to: self.state,
        }
    }

    fn at_middle(&self) -> bool {
        self.parts.stations.mid_a.state() || self.parts.stations.mid_b.state()
    }

    /// Drive towards a station; returns `true` once arrived (conveyor stopped)
    fn drive_until(&mut self, dir: Direction, arrived: bool) -> bool {
        if arrived {
            self.parts.conveyor.stop();
            return true;
        }
        if self.parts.conveyor.direction() != Some(dir) {
            self.parts.conveyor.run(dir);
        }
        false
    }

    fn to_end(&mut self, now_ms: u32) -> Option<SequenceEvent> {
        match self.phase {
            StepPhase::Entry => {
                let arrived = self.parts.stations.end.state();
                if self.drive_until(Direction::CounterClockwise, arrived) {
                    self.phase = StepPhase::Dwelling { since: now_ms };
                }
                None
            }
            StepPhase::Dwelling { since } if elapsed(now_ms, since) >= self.config.end_dwell_ms => {
                Some(self.advance())
            }
            _ => None,
        }
    }

    fn weigh(&mut self, now_ms: u32, leg: Leg) -> Option<SequenceEvent> {
        let settle = self.config.settle_ms;
        match self.phase {
            StepPhase::Entry => {
                self.phase = StepPhase::Settling { since: now_ms };
                None
            }
            StepPhase::Settling { since } if elapsed(now_ms, since) >= settle => {
                self.parts.lift.move_to_named(self.config.weigh_setpoint);
                self.phase = StepPhase::Holding { since: now_ms };
                None
            }
            StepPhase::Holding { since } if elapsed(now_ms, since) >= self.config.hold_ms => {
                let force = self.parts.scale.read();
                self.parts.lift.move_to_named(self.config.rest_setpoint);
                self.phase = StepPhase::Lowering { since: now_ms };
                Some(SequenceEvent::Weighed(WeighResult { leg, force }))
            }
            StepPhase::Lowering { since } if elapsed(now_ms, since) >= settle => {
                Some(self.advance())
            }
            _ => None,
        }
    }

    /// Current state
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Completed cycles since construction
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Latched fault, if any
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Sequence timing
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Owned components
    pub fn parts(&self) -> &MachineParts<H> {
        &self.parts
    }

    /// Owned components, mutably
    pub fn parts_mut(&mut self) -> &mut MachineParts<H> {
        &mut self.parts
    }

    /// Telemetry sink
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Status indicator
    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::fault::{Device, SafetyFault};
    use crate::telemetry::{RateLimiter, TelemetryError};
    use crate::traits::Setpoint;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::string::{String, ToString};
    use std::vec::Vec;

    #[derive(Clone, Default)]
    struct SimStation {
        present: Rc<Cell<bool>>,
        stored: bool,
    }

    impl DigitalInput for SimStation {
        fn read(&mut self) -> bool {
            self.present.get()
        }
        fn changed(&mut self) -> bool {
            let now = self.read();
            let changed = now != self.stored;
            self.stored = now;
            changed
        }
        fn state(&self) -> bool {
            self.stored
        }
    }

    #[derive(Clone, Default)]
    struct SimConveyor {
        dir: Rc<Cell<Option<Direction>>>,
        commands: Rc<Cell<u32>>,
    }

    impl ConveyorDrive for SimConveyor {
        fn run_cw(&mut self) {
            self.commands.set(self.commands.get() + 1);
            self.dir.set(Some(Direction::Clockwise));
        }
        fn run_ccw(&mut self) {
            self.commands.set(self.commands.get() + 1);
            self.dir.set(Some(Direction::CounterClockwise));
        }
        fn stop(&mut self) {
            self.dir.set(None);
        }
        fn direction(&self) -> Option<Direction> {
            self.dir.get()
        }
    }

    #[derive(Clone)]
    struct SimLift {
        pos: Rc<Cell<i32>>,
    }

    impl LiftDrive for SimLift {
        fn move_to_named(&mut self, pos: Setpoint) {
            self.pos.set(self.setpoint_position(pos));
        }
        fn position(&self) -> i32 {
            self.pos.get()
        }
        fn setpoint_position(&self, pos: Setpoint) -> i32 {
            pos.resolve(1500, 8150)
        }
    }

    #[derive(Clone, Default)]
    struct SimLatch {
        set: Rc<Cell<bool>>,
        both: Rc<Cell<bool>>,
    }

    impl StartStopInput for SimLatch {
        fn both_pressed(&mut self) -> bool {
            self.both.get()
        }
        fn check_state(&mut self) -> bool {
            self.set.get()
        }
        fn is_set(&self) -> bool {
            self.set.get()
        }
    }

    #[derive(Clone, Default)]
    struct SimScale {
        force: Rc<Cell<f32>>,
    }

    impl AnalogInput for SimScale {
        fn read(&mut self) -> f32 {
            self.force.get()
        }
        fn update(&mut self) -> f32 {
            0.0
        }
    }

    struct SimVibration;

    impl AxisInput for SimVibration {
        fn read_axes(&mut self) -> [f32; 3] {
            [0.0; 3]
        }
        fn update_axes(&mut self) -> [f32; 3] {
            [0.0; 3]
        }
    }

    #[derive(Clone, Default)]
    struct SimSink {
        header: Rc<RefCell<Vec<String>>>,
        rows: Rc<RefCell<Vec<(u32, Vec<Value>)>>>,
        limiter: Option<RateLimiter>,
        interval_ms: u32,
        broken: Rc<Cell<bool>>,
    }

    impl TelemetrySink for SimSink {
        fn setup(&mut self, now_ms: u32, header: &[&str]) -> Result<(), TelemetryError> {
            *self.header.borrow_mut() = header.iter().map(|h| h.to_string()).collect();
            let mut limiter = RateLimiter::new(self.interval_ms);
            limiter.start(now_ms);
            self.limiter = Some(limiter);
            Ok(())
        }
        fn append(&mut self, now_ms: u32, record: &[Value]) -> Result<bool, TelemetryError> {
            if self.broken.get() {
                return Err(TelemetryError::Write);
            }
            let limiter = self
                .limiter
                .as_mut()
                .ok_or(TelemetryError::Layout(ConfigError::TelemetryNotSetUp))?;
            if !limiter.try_accept(now_ms) {
                return Ok(false);
            }
            self.rows.borrow_mut().push((now_ms, record.to_vec()));
            Ok(true)
        }
    }

    #[derive(Clone, Default)]
    struct SimIndicator {
        running: Rc<Cell<bool>>,
        toggles: Rc<Cell<u32>>,
        fault_blinks: Rc<Cell<Option<u8>>>,
    }

    impl StatusIndicator for SimIndicator {
        fn set_running(&mut self, on: bool) {
            self.running.set(on);
        }
        fn toggle_running(&mut self) {
            self.toggles.set(self.toggles.get() + 1);
            self.running.set(!self.running.get());
        }
        fn signal_fault(&mut self, blink_count: u8) {
            self.running.set(false);
            self.fault_blinks.set(Some(blink_count));
        }
    }

    struct Sim;

    impl Hardware for Sim {
        type Station = SimStation;
        type Conveyor = SimConveyor;
        type Lift = SimLift;
        type Latch = SimLatch;
        type Scale = SimScale;
        type Vibration = SimVibration;
    }

    /// Handles to the simulated world, shared with the controller
    struct World {
        start: Rc<Cell<bool>>,
        mid_a: Rc<Cell<bool>>,
        mid_b: Rc<Cell<bool>>,
        end: Rc<Cell<bool>>,
        conveyor: SimConveyor,
        lift: Rc<Cell<i32>>,
        latch: SimLatch,
        force: Rc<Cell<f32>>,
        sink: SimSink,
        indicator: SimIndicator,
    }

    impl World {
        fn place_only(&self, station: &Rc<Cell<bool>>) {
            for s in [&self.start, &self.mid_a, &self.mid_b, &self.end] {
                s.set(false);
            }
            station.set(true);
        }
    }

    fn quick_timing() -> SequenceConfig {
        SequenceConfig {
            tick_ms: 10,
            settle_ms: 0,
            hold_ms: 0,
            end_dwell_ms: 0,
            ..SequenceConfig::default()
        }
    }

    fn build(config: SequenceConfig, interval_ms: u32) -> (SequenceController<Sim, SimSink, SimIndicator>, World) {
        let stations = Stations {
            start: SimStation::default(),
            mid_a: SimStation::default(),
            mid_b: SimStation::default(),
            end: SimStation::default(),
        };
        let lift = SimLift {
            pos: Rc::new(Cell::new(4825)),
        };
        let world = World {
            start: stations.start.present.clone(),
            mid_a: stations.mid_a.present.clone(),
            mid_b: stations.mid_b.present.clone(),
            end: stations.end.present.clone(),
            conveyor: SimConveyor::default(),
            lift: lift.pos.clone(),
            latch: SimLatch::default(),
            force: Rc::new(Cell::new(0.0)),
            sink: SimSink {
                interval_ms,
                ..SimSink::default()
            },
            indicator: SimIndicator::default(),
        };
        let parts = MachineParts::<Sim> {
            stations,
            conveyor: world.conveyor.clone(),
            lift,
            latch: world.latch.clone(),
            scale: SimScale {
                force: world.force.clone(),
            },
            vibration: SimVibration,
        };
        let mut controller =
            SequenceController::new(parts, world.sink.clone(), world.indicator.clone(), config)
                .unwrap();
        controller.setup(0, &StationConfig::default()).unwrap();
        (controller, world)
    }

    /// Tick until the controller reaches `target`, returning the tick time
    fn run_until(
        controller: &mut SequenceController<Sim, SimSink, SimIndicator>,
        mut now: u32,
        target: SequenceState,
    ) -> u32 {
        for _ in 0..50 {
            if controller.state() == target {
                return now;
            }
            now += 10;
            controller.tick(now).unwrap();
        }
        panic!("never reached {:?}, stuck in {:?}", target, controller.state());
    }

    #[test]
    fn test_idle_until_latch_set() {
        let (mut controller, world) = build(quick_timing(), 0);
        for t in 1..5 {
            assert_eq!(controller.tick(t * 10), Ok(None));
        }
        assert_eq!(controller.state(), SequenceState::Idle);
        assert_eq!(world.indicator.toggles.get(), 4);
        assert_eq!(world.conveyor.direction(), None);

        world.latch.set.set(true);
        assert_eq!(
            controller.tick(50),
            Ok(Some(SequenceEvent::Transition {
                from: SequenceState::Idle,
                to: SequenceState::Start
            }))
        );
    }

    #[test]
    fn test_start_lowers_lift_and_sets_running() {
        let (mut controller, world) = build(quick_timing(), 0);
        world.latch.set.set(true);
        controller.tick(10).unwrap();
        controller.tick(20).unwrap();
        assert_eq!(controller.state(), SequenceState::MoveToStart);
        assert!(world.indicator.running.get());
        assert_eq!(world.lift.get(), 1500);
    }

    #[test]
    fn test_stays_in_move_to_start_until_sensor() {
        let (mut controller, world) = build(quick_timing(), 0);
        world.latch.set.set(true);
        let mut now = run_until(&mut controller, 0, SequenceState::MoveToStart);

        for _ in 0..10 {
            now += 10;
            assert_eq!(controller.tick(now), Ok(None));
            assert_eq!(controller.state(), SequenceState::MoveToStart);
            assert_eq!(world.conveyor.direction(), Some(Direction::Clockwise));
        }
        // Drive command issued once, not re-issued every tick
        assert_eq!(world.conveyor.commands.get(), 1);

        world.place_only(&world.start);
        now += 10;
        assert_eq!(
            controller.tick(now),
            Ok(Some(SequenceEvent::Transition {
                from: SequenceState::MoveToStart,
                to: SequenceState::ToMiddleA
            }))
        );
        assert_eq!(world.conveyor.direction(), None);
    }

    #[test]
    fn test_full_cycle() {
        let (mut controller, world) = build(quick_timing(), 0);
        world.latch.set.set(true);
        world.force.set(42.5);

        let mut now = run_until(&mut controller, 0, SequenceState::MoveToStart);
        world.place_only(&world.start);
        now = run_until(&mut controller, now, SequenceState::ToMiddleA);

        now += 10;
        controller.tick(now).unwrap();
        assert_eq!(world.conveyor.direction(), Some(Direction::CounterClockwise));
        world.place_only(&world.mid_a);
        now = run_until(&mut controller, now, SequenceState::WeighUp);

        // Settle, raise, hold, lower
        let mut weighed = Vec::new();
        while controller.state() == SequenceState::WeighUp {
            now += 10;
            if let Some(SequenceEvent::Weighed(result)) = controller.tick(now).unwrap() {
                assert_eq!(world.lift.get(), 1500);
                weighed.push(result);
            }
        }
        assert_eq!(
            weighed,
            [WeighResult {
                leg: Leg::Outbound,
                force: 42.5
            }]
        );
        assert_eq!(controller.state(), SequenceState::ToEnd);

        now += 10;
        controller.tick(now).unwrap();
        assert_eq!(world.conveyor.direction(), Some(Direction::CounterClockwise));
        world.place_only(&world.end);
        now = run_until(&mut controller, now, SequenceState::ToMiddleB);

        now += 10;
        controller.tick(now).unwrap();
        assert_eq!(world.conveyor.direction(), Some(Direction::Clockwise));
        world.place_only(&world.mid_b);
        now = run_until(&mut controller, now, SequenceState::WeighDown);
        now = run_until(&mut controller, now, SequenceState::ReturnStart);

        now += 10;
        controller.tick(now).unwrap();
        assert_eq!(world.conveyor.direction(), Some(Direction::Clockwise));
        world.place_only(&world.start);
        now = run_until(&mut controller, now, SequenceState::SequenceDone);

        now += 10;
        assert_eq!(
            controller.tick(now),
            Ok(Some(SequenceEvent::CycleComplete { cycles: 1 }))
        );
        assert_eq!(controller.state(), SequenceState::ToMiddleA);
        assert_eq!(controller.cycles(), 1);
    }

    #[test]
    fn test_weigh_phases_follow_timing() {
        let config = SequenceConfig {
            settle_ms: 1000,
            hold_ms: 1000,
            ..SequenceConfig::default()
        };
        let (mut controller, world) = build(config, 0);
        world.latch.set.set(true);
        world.place_only(&world.start);
        let now = run_until(&mut controller, 0, SequenceState::ToMiddleA);
        world.place_only(&world.mid_a);
        let entered = run_until(&mut controller, now, SequenceState::WeighUp);

        // Entry tick starts the settle timer
        controller.tick(entered + 300).unwrap();
        controller.tick(entered + 900).unwrap();
        assert_eq!(world.lift.get(), 1500);
        controller.tick(entered + 1300).unwrap();
        assert_eq!(world.lift.get(), 8150);

        controller.tick(entered + 2000).unwrap();
        assert_eq!(world.lift.get(), 8150);
        assert!(matches!(
            controller.tick(entered + 2300),
            Ok(Some(SequenceEvent::Weighed(_)))
        ));
        assert_eq!(world.lift.get(), 1500);

        assert_eq!(controller.tick(entered + 3000), Ok(None));
        assert_eq!(controller.state(), SequenceState::WeighUp);
        controller.tick(entered + 3300).unwrap();
        assert_eq!(controller.state(), SequenceState::ToEnd);
    }

    #[test]
    fn test_end_dwell() {
        let config = SequenceConfig {
            end_dwell_ms: 1000,
            ..quick_timing()
        };
        let (mut controller, world) = build(config, 0);
        world.latch.set.set(true);
        world.place_only(&world.start);
        let now = run_until(&mut controller, 0, SequenceState::ToMiddleA);
        world.place_only(&world.mid_a);
        let now = run_until(&mut controller, now, SequenceState::ToEnd);

        world.place_only(&world.end);
        controller.tick(now + 10).unwrap();
        assert_eq!(world.conveyor.direction(), None);
        controller.tick(now + 500).unwrap();
        assert_eq!(controller.state(), SequenceState::ToEnd);
        controller.tick(now + 1010).unwrap();
        assert_eq!(controller.state(), SequenceState::ToMiddleB);
    }

    #[test]
    fn test_abort_from_every_state() {
        for target in SequenceState::ALL.into_iter().skip(1) {
            let (mut controller, world) = build(quick_timing(), 0);
            world.latch.set.set(true);

            // Walk the product along so every state is reachable
            let mut now = 0;
            for _ in 0..60 {
                if controller.state() == target {
                    break;
                }
                match controller.state() {
                    SequenceState::MoveToStart | SequenceState::ReturnStart => {
                        world.place_only(&world.start)
                    }
                    SequenceState::ToMiddleA => world.place_only(&world.mid_a),
                    SequenceState::ToEnd => world.place_only(&world.end),
                    SequenceState::ToMiddleB => world.place_only(&world.mid_b),
                    _ => {}
                }
                now += 10;
                controller.tick(now).unwrap();
            }
            assert_eq!(controller.state(), target);

            // Put the conveyor in motion where the state drives it
            if target.drives_conveyor() {
                world.place_only(&world.end);
                if target == SequenceState::ToEnd {
                    world.place_only(&world.start);
                }
                now += 10;
                controller.tick(now).unwrap();
                assert!(world.conveyor.direction().is_some(), "{:?}", target);
            }

            world.latch.set.set(false);
            now += 10;
            assert_eq!(
                controller.tick(now),
                Ok(Some(SequenceEvent::Aborted { from: target }))
            );
            assert_eq!(controller.state(), SequenceState::Idle);
            assert_eq!(world.conveyor.direction(), None);
            assert!(!world.indicator.running.get());
        }
    }

    #[test]
    fn test_both_pressed_is_safety_fault() {
        let (mut controller, world) = build(quick_timing(), 0);
        world.latch.set.set(true);
        let now = run_until(&mut controller, 0, SequenceState::MoveToStart);
        controller.tick(now + 10).unwrap();
        assert!(world.conveyor.direction().is_some());

        world.latch.both.set(true);
        let fault = Fault::Safety(SafetyFault::BothPressed);
        assert_eq!(controller.tick(now + 20), Err(fault));
        assert_eq!(world.conveyor.direction(), None);
        assert_eq!(world.indicator.fault_blinks.get(), Some(0));
        assert!(!world.indicator.running.get());

        // Latched: releasing the buttons does not restart anything
        world.latch.both.set(false);
        assert_eq!(controller.tick(now + 30), Err(fault));
        assert_eq!(controller.fault(), Some(fault));
        assert_eq!(controller.state(), SequenceState::MoveToStart);
        assert_eq!(world.conveyor.direction(), None);
    }

    #[test]
    fn test_telemetry_write_failure_is_missing_device() {
        let (mut controller, world) = build(quick_timing(), 0);
        world.sink.broken.set(true);
        assert_eq!(
            controller.tick(10),
            Err(Fault::MissingDevice(Device::TelemetryTarget))
        );
    }

    #[test]
    fn test_telemetry_rate_limited() {
        let (mut controller, world) = build(quick_timing(), 1000);
        for now in [300, 600, 900, 1200, 1500, 1800, 2100, 2400] {
            controller.tick(now).unwrap();
        }
        let rows = world.sink.rows.borrow();
        let times: Vec<u32> = rows.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, [1200, 2400]);
        assert_eq!(rows[0].1.len(), world.sink.header.borrow().len());
    }

    #[test]
    fn test_header_from_station_names() {
        let (_controller, world) = build(quick_timing(), 0);
        assert_eq!(
            *world.sink.header.borrow(),
            ["A1", "A2", "B2", "B1", "Force", "AccX", "AccY", "AccZ"]
        );
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = SequenceConfig {
            tick_ms: 0,
            ..SequenceConfig::default()
        };
        let (controller, _world) = build(quick_timing(), 0);
        let result = SequenceController::new(
            controller.parts,
            SimSink::default(),
            SimIndicator::default(),
            config,
        );
        assert!(matches!(result, Err(ConfigError::InvalidTickPeriod)));
    }
}
