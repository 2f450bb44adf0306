//! Sensor fault reporting

use crate::traits::FaultKind;

/// Which sensor faulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultSource {
    /// Center break-beam
    CenterBeam,
    /// Top break-beam
    TopBeam,
    /// Carriage absolute encoder
    Encoder,
}

/// A sensor that could not deliver a valid reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFault {
    pub source: FaultSource,
    pub kind: FaultKind,
}

impl SensorFault {
    pub const fn new(source: FaultSource, kind: FaultKind) -> Self {
        Self { source, kind }
    }

    pub const fn encoder(kind: FaultKind) -> Self {
        Self::new(FaultSource::Encoder, kind)
    }
}
