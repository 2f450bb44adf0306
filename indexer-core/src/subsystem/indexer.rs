//! Indexer subsystem
//!
//! Groups the actuator array, the sensor gate and the position controller
//! behind one owner, the way the scheduler hands it to a command.

use crate::actuators::{ActuatorArray, DriveId};
use crate::control::PositionController;
use crate::sensor::{SensorFault, SensorGate, SensorState};
use crate::traits::{AngleSensor, DigitalSensor, Drive, TelemetrySink};

/// Operations the indexer command needs from the subsystem
pub trait IndexerControl {
    /// Read both beams once
    fn snapshot(&mut self) -> Result<SensorState, SensorFault>;

    fn set_percent(&mut self, id: DriveId, percent: f32);

    fn set_all_feed_wheels_percent(&mut self, percent: f32);

    /// Drive the carriage toward `target`, returning the applied volts
    fn move_to_angle(&mut self, target: f32, now_ms: u32) -> Result<f32, SensorFault>;

    /// Zero every drive
    fn stop_all(&mut self);

    /// Drop carriage controller history
    fn reset_motion(&mut self);
}

/// The indexer: three drives, two beams, one carriage controller
pub struct Indexer<T, B, R, E, C, P> {
    actuators: ActuatorArray<T, B, R>,
    sensors: SensorGate<C, P>,
    position: PositionController<E>,
}

impl<T, B, R, E, C, P> Indexer<T, B, R, E, C, P>
where
    T: Drive,
    B: Drive,
    R: Drive,
    E: AngleSensor,
    C: DigitalSensor,
    P: DigitalSensor,
{
    pub fn new(
        actuators: ActuatorArray<T, B, R>,
        sensors: SensorGate<C, P>,
        position: PositionController<E>,
    ) -> Self {
        Self {
            actuators,
            sensors,
            position,
        }
    }

    pub fn actuators(&self) -> &ActuatorArray<T, B, R> {
        &self.actuators
    }

    pub fn actuators_mut(&mut self) -> &mut ActuatorArray<T, B, R> {
        &mut self.actuators
    }

    pub fn sensors_mut(&mut self) -> &mut SensorGate<C, P> {
        &mut self.sensors
    }

    pub fn position(&self) -> &PositionController<E> {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut PositionController<E> {
        &mut self.position
    }

    /// True once the carriage sits within tolerance of its goal
    pub fn is_rotated(&mut self) -> Result<bool, SensorFault> {
        self.position.at_goal()
    }

    /// Publish the carriage angle, goal and error
    ///
    /// Called once per scheduler cycle regardless of which command runs.
    /// Nothing is published for a faulted encoder.
    pub fn periodic<S: TelemetrySink>(&mut self, sink: &mut S) {
        let Ok(angle) = self.position.current_angle() else {
            return;
        };
        sink.publish("Current", angle);
        if let Some(goal) = self.position.goal() {
            sink.publish("Goal", goal);
        }
        if let Ok(Some(error)) = self.position.position_error() {
            sink.publish("Error", error);
        }
    }
}

impl<T, B, R, E, C, P> IndexerControl for Indexer<T, B, R, E, C, P>
where
    T: Drive,
    B: Drive,
    R: Drive,
    E: AngleSensor,
    C: DigitalSensor,
    P: DigitalSensor,
{
    fn snapshot(&mut self) -> Result<SensorState, SensorFault> {
        self.sensors.snapshot()
    }

    fn set_percent(&mut self, id: DriveId, percent: f32) {
        self.actuators.set_percent(id, percent);
    }

    fn set_all_feed_wheels_percent(&mut self, percent: f32) {
        self.actuators.set_all_feed_wheels_percent(percent);
    }

    fn move_to_angle(&mut self, target: f32, now_ms: u32) -> Result<f32, SensorFault> {
        let mut rotate = self.actuators.drive(DriveId::Rotate);
        self.position.move_to_angle(target, now_ms, &mut rotate)
    }

    fn stop_all(&mut self) {
        self.actuators.stop_all();
    }

    fn reset_motion(&mut self) {
        self.position.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::ActuatorCommand;
    use crate::config::IndexerConfig;
    use crate::mock::{mock_indexer, RecordingTelemetry};
    use crate::traits::FaultKind;

    #[test]
    fn test_move_to_angle_commands_rotate_volts() {
        let config = IndexerConfig::default();
        let mut indexer = mock_indexer(&config, 1.0);

        let effort = indexer.move_to_angle(2.0, 0).unwrap();
        assert_eq!(
            indexer.actuators().command(DriveId::Rotate),
            ActuatorCommand::Volts(effort)
        );
        assert_eq!(indexer.actuators().rotate().last_volts(), Some(effort));
        assert_eq!(indexer.actuators().top().last(), None);
    }

    #[test]
    fn test_is_rotated() {
        let config = IndexerConfig::default();
        let mut indexer = mock_indexer(&config, 2.0);
        assert!(!indexer.is_rotated().unwrap());

        indexer.move_to_angle(2.01, 0).unwrap();
        assert!(indexer.is_rotated().unwrap());
    }

    #[test]
    fn test_snapshot_inverts_beams() {
        let config = IndexerConfig::default();
        let mut indexer = mock_indexer(&config, 0.0);
        indexer.sensors_mut().center_mut().set_broken(true);

        assert_eq!(indexer.snapshot(), Ok(SensorState::new(true, false)));
    }

    #[test]
    fn test_periodic_publishes() {
        let config = IndexerConfig::default();
        let mut indexer = mock_indexer(&config, 1.0);
        let mut sink = RecordingTelemetry::new();

        indexer.periodic(&mut sink);
        assert_eq!(sink.latest("Current"), Some(1.0));
        assert_eq!(sink.latest("Goal"), None);

        indexer.move_to_angle(1.5, 0).unwrap();
        indexer.periodic(&mut sink);
        assert_eq!(sink.latest("Goal"), Some(1.5));
        let error = sink.latest("Error").unwrap();
        assert!((error - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_periodic_skips_faulted_encoder() {
        let config = IndexerConfig::default();
        let mut indexer = mock_indexer(&config, 1.0);
        indexer
            .position_mut()
            .encoder_mut()
            .fail(FaultKind::Unavailable);
        let mut sink = RecordingTelemetry::new();

        indexer.periodic(&mut sink);
        assert!(sink.entries.is_empty());
    }

    #[test]
    fn test_stop_all() {
        let config = IndexerConfig::default();
        let mut indexer = mock_indexer(&config, 1.0);
        indexer.set_all_feed_wheels_percent(0.3);
        indexer.move_to_angle(2.0, 0).unwrap();

        indexer.stop_all();
        assert!(indexer.actuators().all_stopped());
    }
}
