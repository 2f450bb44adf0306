//! Actuator array
//!
//! Uniform percent/voltage interface over the top feed wheel, the bottom
//! feed wheels and the carriage rotate drive. The array remembers the last
//! command written to each drive so the command layer can report and test
//! what it asked for.

use crate::traits::Drive;

/// Drive identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveId {
    /// Top feed wheel
    TopWheel,
    /// Bottom feed wheels
    BottomWheels,
    /// Carriage rotation
    Rotate,
}

impl DriveId {
    pub const ALL: [DriveId; 3] = [DriveId::TopWheel, DriveId::BottomWheels, DriveId::Rotate];

    pub const FEED_WHEELS: [DriveId; 2] = [DriveId::TopWheel, DriveId::BottomWheels];

    const fn index(self) -> usize {
        match self {
            DriveId::TopWheel => 0,
            DriveId::BottomWheels => 1,
            DriveId::Rotate => 2,
        }
    }
}

/// Last command written to a drive
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    /// Fraction of full output
    Percent(f32),
    /// Output voltage
    Volts(f32),
}

impl ActuatorCommand {
    pub const ZERO: ActuatorCommand = ActuatorCommand::Percent(0.0);

    /// Raw value, whatever the unit
    pub fn value(&self) -> f32 {
        match *self {
            ActuatorCommand::Percent(v) | ActuatorCommand::Volts(v) => v,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value() == 0.0
    }
}

impl Default for ActuatorCommand {
    fn default() -> Self {
        Self::ZERO
    }
}

/// The indexer's three drives
pub struct ActuatorArray<T, B, R> {
    top: T,
    bottom: B,
    rotate: R,
    commands: [ActuatorCommand; 3],
}

impl<T: Drive, B: Drive, R: Drive> ActuatorArray<T, B, R> {
    pub fn new(top: T, bottom: B, rotate: R) -> Self {
        Self {
            top,
            bottom,
            rotate,
            commands: [ActuatorCommand::ZERO; 3],
        }
    }

    pub fn set_percent(&mut self, id: DriveId, percent: f32) {
        match id {
            DriveId::TopWheel => self.top.set_percent(percent),
            DriveId::BottomWheels => self.bottom.set_percent(percent),
            DriveId::Rotate => self.rotate.set_percent(percent),
        }
        self.commands[id.index()] = ActuatorCommand::Percent(percent);
    }

    pub fn set_volts(&mut self, id: DriveId, volts: f32) {
        match id {
            DriveId::TopWheel => self.top.set_voltage(volts),
            DriveId::BottomWheels => self.bottom.set_voltage(volts),
            DriveId::Rotate => self.rotate.set_voltage(volts),
        }
        self.commands[id.index()] = ActuatorCommand::Volts(volts);
    }

    /// Same percent on both feed wheels
    pub fn set_all_feed_wheels_percent(&mut self, percent: f32) {
        for id in DriveId::FEED_WHEELS {
            self.set_percent(id, percent);
        }
    }

    /// Same voltage on both feed wheels
    pub fn set_all_feed_wheels_volts(&mut self, volts: f32) {
        for id in DriveId::FEED_WHEELS {
            self.set_volts(id, volts);
        }
    }

    /// Zero every drive, rotate included
    pub fn stop_all(&mut self) {
        for id in DriveId::ALL {
            self.set_percent(id, 0.0);
        }
    }

    /// Last command written to `id`
    pub fn command(&self, id: DriveId) -> ActuatorCommand {
        self.commands[id.index()]
    }

    /// True if every drive was last commanded to zero
    pub fn all_stopped(&self) -> bool {
        self.commands.iter().all(ActuatorCommand::is_zero)
    }

    /// Borrow one drive as a plain [`Drive`], keeping command tracking
    pub fn drive(&mut self, id: DriveId) -> DriveHandle<'_, T, B, R> {
        DriveHandle { array: self, id }
    }

    pub fn top(&self) -> &T {
        &self.top
    }

    pub fn bottom(&self) -> &B {
        &self.bottom
    }

    pub fn rotate(&self) -> &R {
        &self.rotate
    }
}

/// One drive of an [`ActuatorArray`]
pub struct DriveHandle<'a, T, B, R> {
    array: &'a mut ActuatorArray<T, B, R>,
    id: DriveId,
}

impl<T: Drive, B: Drive, R: Drive> Drive for DriveHandle<'_, T, B, R> {
    fn set_percent(&mut self, percent: f32) {
        self.array.set_percent(self.id, percent);
    }

    fn set_voltage(&mut self, volts: f32) {
        self.array.set_volts(self.id, volts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingDrive;

    fn array() -> ActuatorArray<RecordingDrive, RecordingDrive, RecordingDrive> {
        ActuatorArray::new(
            RecordingDrive::new(),
            RecordingDrive::new(),
            RecordingDrive::new(),
        )
    }

    #[test]
    fn test_set_percent_targets_one_drive() {
        let mut a = array();
        a.set_percent(DriveId::TopWheel, -0.22);

        assert_eq!(a.top().last(), Some(ActuatorCommand::Percent(-0.22)));
        assert_eq!(a.bottom().last(), None);
        assert_eq!(a.rotate().last(), None);
        assert_eq!(a.command(DriveId::TopWheel), ActuatorCommand::Percent(-0.22));
    }

    #[test]
    fn test_volts_replaces_percent() {
        let mut a = array();
        a.set_percent(DriveId::Rotate, 0.5);
        a.set_volts(DriveId::Rotate, 3.0);
        assert_eq!(a.command(DriveId::Rotate), ActuatorCommand::Volts(3.0));
        assert_eq!(a.rotate().last_volts(), Some(3.0));
    }

    #[test]
    fn test_all_feed_wheels() {
        let mut a = array();
        a.set_all_feed_wheels_percent(0.3);
        assert_eq!(a.top().last(), Some(ActuatorCommand::Percent(0.3)));
        assert_eq!(a.bottom().last(), Some(ActuatorCommand::Percent(0.3)));
        assert_eq!(a.rotate().last(), None);

        a.set_all_feed_wheels_volts(4.0);
        assert_eq!(a.command(DriveId::TopWheel), ActuatorCommand::Volts(4.0));
        assert_eq!(a.command(DriveId::BottomWheels), ActuatorCommand::Volts(4.0));
    }

    #[test]
    fn test_no_range_validation() {
        let mut a = array();
        a.set_percent(DriveId::BottomWheels, 7.5);
        assert_eq!(a.bottom().last(), Some(ActuatorCommand::Percent(7.5)));
    }

    #[test]
    fn test_stop_all_zeroes_everything() {
        let mut a = array();
        a.set_percent(DriveId::TopWheel, 0.3);
        a.set_percent(DriveId::BottomWheels, 0.3);
        a.set_volts(DriveId::Rotate, 6.0);
        assert!(!a.all_stopped());

        a.stop_all();
        assert!(a.all_stopped());
        for id in DriveId::ALL {
            assert_eq!(a.command(id), ActuatorCommand::ZERO);
        }
        assert_eq!(a.rotate().last(), Some(ActuatorCommand::ZERO));
    }

    #[test]
    fn test_drive_handle_tracks() {
        let mut a = array();
        a.drive(DriveId::Rotate).set_voltage(-2.0);
        assert_eq!(a.command(DriveId::Rotate), ActuatorCommand::Volts(-2.0));
        a.drive(DriveId::Rotate).stop();
        assert_eq!(a.command(DriveId::Rotate), ActuatorCommand::ZERO);
    }
}
