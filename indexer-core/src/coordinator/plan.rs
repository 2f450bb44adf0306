//! Per-tick output plan

use heapless::Vec;

use crate::actuators::DriveId;

/// Most writes any mode emits in one tick
pub const MAX_WRITES: usize = 8;

/// One output write, applied in plan order
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputWrite {
    /// Percent on one feed wheel drive
    Wheel { drive: DriveId, percent: f32 },
    /// Percent on both feed wheels
    AllFeedWheels(f32),
    /// Intake top roller
    IntakeTop(f32),
    /// Intake bottom roller
    IntakeBottom(f32),
    /// Both intake rollers
    Intake(f32),
}

/// Everything the command applies for one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickPlan {
    pub writes: Vec<OutputWrite, MAX_WRITES>,
    /// Carriage angle to hold this tick (rad, before clamping)
    pub rotate_target: Option<f32>,
    /// Rumble intensity for every operator channel
    pub haptic: Option<f32>,
    /// Status light pattern
    pub indicator: Option<f32>,
}

impl TickPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, write: OutputWrite) {
        // Modes emit at most six writes
        let _ = self.writes.push(write);
    }

    /// Percent `drive` ends the tick at, if any write touches it
    pub fn final_wheel(&self, drive: DriveId) -> Option<f32> {
        self.writes.iter().fold(None, |acc, write| match *write {
            OutputWrite::Wheel { drive: d, percent } if d == drive => Some(percent),
            OutputWrite::AllFeedWheels(percent) => Some(percent),
            _ => acc,
        })
    }

    /// Intake top and bottom speeds the tick ends at
    pub fn final_intake(&self) -> (Option<f32>, Option<f32>) {
        self.writes
            .iter()
            .fold((None, None), |(top, bottom), write| match *write {
                OutputWrite::IntakeTop(v) => (Some(v), bottom),
                OutputWrite::IntakeBottom(v) => (top, Some(v)),
                OutputWrite::Intake(v) => (Some(v), Some(v)),
                _ => (top, bottom),
            })
    }

    /// True if the plan touches neither feed wheels nor intake
    pub fn leaves_feed_untouched(&self) -> bool {
        self.writes.is_empty()
    }
}
