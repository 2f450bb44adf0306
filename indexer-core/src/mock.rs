//! Recording fakes for the port traits
//!
//! Compiled for this crate's tests and behind the `mock` feature for
//! downstream crates. Everything records into fixed-capacity buffers;
//! writes past capacity are dropped, the counters keep counting.

use heapless::Vec;

use crate::actuators::{ActuatorArray, ActuatorCommand};
use crate::config::IndexerConfig;
use crate::control::PositionController;
use crate::sensor::SensorGate;
use crate::subsystem::Indexer;
use crate::traits::{
    AngleSensor, DigitalSensor, Drive, FaultKind, HapticChannel, HapticFeedback, IntakeLink,
    StatusIndicator, TelemetrySink,
};

/// Drive that remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingDrive {
    last: Option<ActuatorCommand>,
    writes: u32,
}

impl RecordingDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<ActuatorCommand> {
        self.last
    }

    pub fn last_volts(&self) -> Option<f32> {
        match self.last {
            Some(ActuatorCommand::Volts(v)) => Some(v),
            _ => None,
        }
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl Drive for RecordingDrive {
    fn set_percent(&mut self, percent: f32) {
        self.last = Some(ActuatorCommand::Percent(percent));
        self.writes += 1;
    }

    fn set_voltage(&mut self, volts: f32) {
        self.last = Some(ActuatorCommand::Volts(volts));
        self.writes += 1;
    }
}

/// Break-beam line set by the test
///
/// Stores the raw (active-low) level, so `set_broken(true)` reads `false`.
#[derive(Debug)]
pub struct ScriptedBeam {
    raw: bool,
    fault: Option<FaultKind>,
    reads: u32,
}

impl ScriptedBeam {
    pub fn raw(level: bool) -> Self {
        Self {
            raw: level,
            fault: None,
            reads: 0,
        }
    }

    /// Unobstructed beam
    pub fn clear() -> Self {
        Self::raw(true)
    }

    /// Obstructed beam
    pub fn broken() -> Self {
        Self::raw(false)
    }

    pub fn set_broken(&mut self, broken: bool) {
        self.raw = !broken;
    }

    pub fn fail(&mut self, kind: FaultKind) {
        self.fault = Some(kind);
    }

    pub fn recover(&mut self) {
        self.fault = None;
    }

    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl DigitalSensor for ScriptedBeam {
    fn read(&mut self) -> Result<bool, FaultKind> {
        self.reads += 1;
        match self.fault {
            Some(kind) => Err(kind),
            None => Ok(self.raw),
        }
    }
}

/// Encoder reporting a fixed angle
#[derive(Debug)]
pub struct FakeEncoder {
    position: f32,
    velocity: f32,
    fault: Option<FaultKind>,
}

impl FakeEncoder {
    pub fn at(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
            fault: None,
        }
    }

    pub fn set_position(&mut self, position: f32) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    pub fn fail(&mut self, kind: FaultKind) {
        self.fault = Some(kind);
    }

    pub fn recover(&mut self) {
        self.fault = None;
    }
}

impl AngleSensor for FakeEncoder {
    fn position(&mut self) -> Result<f32, FaultKind> {
        match self.fault {
            Some(kind) => Err(kind),
            None => Ok(self.position),
        }
    }

    fn velocity(&mut self) -> Result<f32, FaultKind> {
        match self.fault {
            Some(kind) => Err(kind),
            None => Ok(self.velocity),
        }
    }
}

/// Intake roller speeds as last commanded
#[derive(Debug, Default)]
pub struct RecordingIntake {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub writes: u32,
}

impl RecordingIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if both rollers were last commanded to zero
    pub fn is_stopped(&self) -> bool {
        self.top == Some(0.0) && self.bottom == Some(0.0)
    }
}

impl IntakeLink for RecordingIntake {
    fn set_top_speed(&mut self, percent: f32) {
        self.top = Some(percent);
        self.writes += 1;
    }

    fn set_bottom_speed(&mut self, percent: f32) {
        self.bottom = Some(percent);
        self.writes += 1;
    }
}

/// Rumble signals in order
#[derive(Debug, Default)]
pub struct RecordingHaptic {
    pub signals: Vec<(HapticChannel, f32), 16>,
}

impl RecordingHaptic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of signals at `intensity` on `channel`
    pub fn count(&self, channel: HapticChannel, intensity: f32) -> usize {
        self.signals
            .iter()
            .filter(|(c, i)| *c == channel && *i == intensity)
            .count()
    }
}

impl HapticFeedback for RecordingHaptic {
    fn signal(&mut self, channel: HapticChannel, intensity: f32) {
        let _ = self.signals.push((channel, intensity));
    }
}

/// Status light patterns
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    pub last: Option<f32>,
    pub writes: u32,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusIndicator for RecordingIndicator {
    fn set_pattern(&mut self, pattern: f32) {
        self.last = Some(pattern);
        self.writes += 1;
    }
}

/// Telemetry entries in publication order
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    pub entries: Vec<(&'static str, f32), 32>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value published under `key`
    pub fn latest(&self, key: &str) -> Option<f32> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn publish(&mut self, key: &'static str, value: f32) {
        let _ = self.entries.push((key, value));
    }
}

/// Indexer assembled from fakes
pub type MockIndexer = Indexer<
    RecordingDrive,
    RecordingDrive,
    RecordingDrive,
    FakeEncoder,
    ScriptedBeam,
    ScriptedBeam,
>;

/// Build a [`MockIndexer`] with clear beams and the carriage at `angle`
pub fn mock_indexer(config: &IndexerConfig, angle: f32) -> MockIndexer {
    Indexer::new(
        ActuatorArray::new(
            RecordingDrive::new(),
            RecordingDrive::new(),
            RecordingDrive::new(),
        ),
        SensorGate::new(ScriptedBeam::clear(), ScriptedBeam::clear()),
        PositionController::new(FakeEncoder::at(angle), config.controller),
    )
}
