//! Sensor gate over the center and top break-beams

use super::fault::{FaultSource, SensorFault};
use crate::traits::DigitalSensor;

/// Logical beam state captured once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorState {
    /// A piece blocks the center beam
    pub center_broken: bool,
    /// A piece blocks the top beam
    pub top_broken: bool,
}

impl SensorState {
    pub const fn new(center_broken: bool, top_broken: bool) -> Self {
        Self {
            center_broken,
            top_broken,
        }
    }
}

/// Read-through gate over two active-low break-beams
///
/// No debouncing happens here. Settle timing is the coordinator's job, and
/// it relies on seeing every edge as the hardware reports it.
pub struct SensorGate<C, T> {
    center: C,
    top: T,
}

impl<C: DigitalSensor, T: DigitalSensor> SensorGate<C, T> {
    pub fn new(center: C, top: T) -> Self {
        Self { center, top }
    }

    /// True if the center beam is broken
    pub fn is_center_broken(&mut self) -> Result<bool, SensorFault> {
        self.center
            .read()
            .map(|raw| !raw)
            .map_err(|kind| SensorFault::new(FaultSource::CenterBeam, kind))
    }

    /// True if the top beam is broken
    pub fn is_top_broken(&mut self) -> Result<bool, SensorFault> {
        self.top
            .read()
            .map(|raw| !raw)
            .map_err(|kind| SensorFault::new(FaultSource::TopBeam, kind))
    }

    /// Read both beams once
    ///
    /// Every decision within a tick must use the same snapshot.
    pub fn snapshot(&mut self) -> Result<SensorState, SensorFault> {
        Ok(SensorState {
            center_broken: self.is_center_broken()?,
            top_broken: self.is_top_broken()?,
        })
    }

    pub fn center_mut(&mut self) -> &mut C {
        &mut self.center
    }

    pub fn top_mut(&mut self) -> &mut T {
        &mut self.top
    }
}
