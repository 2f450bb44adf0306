use indexer_core::actuators::{ActuatorCommand, DriveId};
use indexer_core::config::IndexerConfig;
use indexer_core::coordinator::{FeedEvent, IndexerCommand, Links, Mode, ModeRequest, TickReport};
use indexer_core::mock::{
    mock_indexer, MockIndexer, RecordingHaptic, RecordingIndicator, RecordingIntake,
    RecordingTelemetry,
};
use indexer_core::safety::SafetyStatus;
use indexer_core::subsystem::IndexerControl;
use indexer_core::traits::{FaultKind, HapticChannel};

const TICK_MS: u32 = 20;

struct Robot {
    indexer: MockIndexer,
    intake: RecordingIntake,
    haptic: RecordingHaptic,
    indicator: RecordingIndicator,
    command: IndexerCommand,
    now_ms: u32,
}

impl Robot {
    fn new() -> Self {
        let config = IndexerConfig::default();
        let mut robot = Self {
            indexer: mock_indexer(&config, 1.0),
            intake: RecordingIntake::new(),
            haptic: RecordingHaptic::new(),
            indicator: RecordingIndicator::new(),
            command: IndexerCommand::new(&config),
            now_ms: 10_000,
        };
        robot.command.initialize(&mut robot.indexer);
        robot
    }

    fn tick(&mut self, request: ModeRequest) -> TickReport {
        let mut links = Links::new(&mut self.intake, &mut self.haptic, &mut self.indicator);
        let report = self
            .command
            .execute(request, self.now_ms, &mut self.indexer, &mut links);
        self.now_ms = self.now_ms.wrapping_add(TICK_MS);
        report
    }

    fn ticks(&mut self, request: ModeRequest, n: usize) -> Vec<TickReport> {
        (0..n).map(|_| self.tick(request)).collect()
    }

    fn end(&mut self) {
        let mut links = Links::new(&mut self.intake, &mut self.haptic, &mut self.indicator);
        self.command.end(&mut self.indexer, &mut links);
    }

    fn center(&mut self, broken: bool) {
        self.indexer.sensors_mut().center_mut().set_broken(broken);
    }

    fn feeding(&self) -> bool {
        self.indexer.actuators().command(DriveId::TopWheel) == ActuatorCommand::Percent(0.3)
            && self.indexer.actuators().command(DriveId::BottomWheels)
                == ActuatorCommand::Percent(0.3)
            && self.intake.top == Some(0.4)
            && self.intake.bottom == Some(0.4)
    }

    fn feed_stopped(&self) -> bool {
        self.indexer.actuators().command(DriveId::TopWheel).is_zero()
            && self.indexer.actuators().command(DriveId::BottomWheels).is_zero()
            && self.intake.is_stopped()
    }

    fn rumbles(&self) -> usize {
        self.haptic.count(HapticChannel::Primary, 1.0)
    }
}

#[test]
fn speaker_cycle_confirms_each_piece_once() {
    let mut robot = Robot::new();

    robot.ticks(ModeRequest::speaker(), 10);
    assert!(robot.feeding());

    // Piece arrives; feeding holds for the settle window
    robot.center(true);
    let reports = robot.ticks(ModeRequest::speaker(), 6);
    assert_eq!(reports[0].event, Some(FeedEvent::EdgeDetected));
    assert!(reports[1..].iter().all(|r| r.event.is_none()));
    assert!(robot.feeding());
    assert_eq!(robot.rumbles(), 0);

    // 120 ms after the edge
    let report = robot.tick(ModeRequest::speaker());
    assert_eq!(report.event, Some(FeedEvent::PieceConfirmed));
    assert!(robot.feed_stopped());
    assert_eq!(robot.rumbles(), 1);
    assert_eq!(robot.haptic.count(HapticChannel::Secondary, 1.0), 1);

    robot.ticks(ModeRequest::speaker(), 20);
    assert!(robot.feed_stopped());
    assert_eq!(robot.rumbles(), 1);

    // Piece leaves, the next one comes in
    robot.center(false);
    let report = robot.tick(ModeRequest::speaker());
    assert_eq!(report.event, Some(FeedEvent::PieceReleased));
    assert!(robot.feeding());

    robot.center(true);
    robot.ticks(ModeRequest::speaker(), 7);
    assert!(robot.feed_stopped());
    assert_eq!(robot.rumbles(), 2);
}

#[test]
fn held_piece_survives_beam_fault() {
    let mut robot = Robot::new();
    robot.ticks(ModeRequest::speaker(), 3);
    robot.center(true);
    robot.ticks(ModeRequest::speaker(), 7);
    assert!(robot.feed_stopped());
    assert_eq!(robot.rumbles(), 1);

    robot.indexer.sensors_mut().top_mut().fail(FaultKind::Unavailable);
    let report = robot.tick(ModeRequest::speaker());
    assert!(matches!(report.safety, SafetyStatus::Fault(_)));
    assert!(robot.indexer.actuators().all_stopped());
    assert!(robot.intake.is_stopped());

    // Piece still in the carriage once the beam answers again
    robot.indexer.sensors_mut().top_mut().recover();
    let reports = robot.ticks(ModeRequest::speaker(), 8);
    assert!(reports.iter().all(|r| r.safety == SafetyStatus::Ok));
    assert!(reports.iter().all(|r| r.event.is_none()));
    assert!(robot.feed_stopped());
    assert_eq!(robot.rumbles(), 1);
}

#[test]
fn transient_break_keeps_feeding() {
    let mut robot = Robot::new();
    robot.tick(ModeRequest::speaker());

    robot.center(true);
    robot.ticks(ModeRequest::speaker(), 3);
    robot.center(false);
    let report = robot.tick(ModeRequest::speaker());

    assert_eq!(report.event, Some(FeedEvent::TransientRejected));
    assert!(robot.feeding());

    robot.ticks(ModeRequest::speaker(), 20);
    assert!(robot.feeding());
    assert!(robot.haptic.signals.is_empty());
}

#[test]
fn source_override_leaves_feed_alone() {
    let mut robot = Robot::new();
    robot.ticks(ModeRequest::speaker(), 3);
    let top_writes = robot.indexer.actuators().top().writes();
    let intake_writes = robot.intake.writes;

    let reports = robot.ticks(ModeRequest::amp().with_source(true), 10);
    assert!(reports.iter().all(|r| r.mode == Mode::SourceLoad));
    assert!(reports.iter().all(|r| r.rotate_effort.is_some()));
    assert_eq!(robot.indexer.actuators().top().writes(), top_writes);
    assert_eq!(robot.intake.writes, intake_writes);
    assert!(robot.feeding());
}

#[test]
fn source_load_reaches_target() {
    let mut robot = Robot::new();
    let mut telemetry = RecordingTelemetry::new();
    let mut angle = 1.0f32;

    for _ in 0..400 {
        let report = robot.tick(ModeRequest::source());
        let effort = report.rotate_effort.unwrap();
        // Integrating plant with gravity pulling against the feedforward
        angle += (effort - 0.35 * angle.cos()) * 0.01;
        robot
            .indexer
            .position_mut()
            .encoder_mut()
            .set_position(angle);
    }

    assert!(robot.indexer.is_rotated().unwrap());
    assert!((angle - 140.0_f32.to_radians()).abs() <= 0.02);

    robot.indexer.periodic(&mut telemetry);
    assert!(telemetry.latest("Error").unwrap().abs() <= 0.02);
}

#[test]
fn termination_mid_window_zeroes_outputs() {
    let mut robot = Robot::new();
    robot.tick(ModeRequest::speaker());
    robot.center(true);
    robot.ticks(ModeRequest::speaker(), 2);
    assert!(robot.feeding());

    robot.end();
    assert!(robot.indexer.actuators().all_stopped());
    assert!(robot.intake.is_stopped());
    assert!(robot.haptic.signals.is_empty());

    // A new invocation starts from a fresh window
    robot.command.initialize(&mut robot.indexer);
    let report = robot.tick(ModeRequest::speaker());
    assert_eq!(report.event, Some(FeedEvent::EdgeDetected));
}

#[test]
fn amp_ends_every_tick_at_zero() {
    let mut robot = Robot::new();
    for report in robot.ticks(ModeRequest::amp(), 5) {
        assert_eq!(report.mode, Mode::Amp);
        assert_eq!(report.safety, SafetyStatus::Ok);
    }
    assert!(robot.feed_stopped());
}

#[test]
fn stop_all_zeroes_every_drive() {
    let mut robot = Robot::new();
    robot.tick(ModeRequest::source());
    robot.indexer.set_all_feed_wheels_percent(0.5);

    robot.indexer.stop_all();
    for id in DriveId::ALL {
        assert_eq!(robot.indexer.actuators().command(id), ActuatorCommand::ZERO);
    }
}
