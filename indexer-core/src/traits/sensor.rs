//! Sensor traits

/// Reasons a sensor could not produce a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaultKind {
    /// Device did not answer (bus error, disconnected line)
    Unavailable,
    /// Device answered with a value outside its physical range
    InvalidReading,
}

/// Raw digital input, such as a break-beam receiver line
///
/// Implementations return the electrical level as read. Break-beam
/// receivers are wired active-low, so a broken beam reads `false`.
/// Inversion belongs to [`SensorGate`](crate::sensor::SensorGate), never
/// to implementations of this trait.
pub trait DigitalSensor {
    /// Read the raw line level
    fn read(&mut self) -> Result<bool, FaultKind>;
}

/// Absolute angle sensor on the carriage
///
/// Values are in physical units: the conversion factor and sign convention
/// are fixed when the sensor is constructed.
pub trait AngleSensor {
    /// Carriage angle in radians
    fn position(&mut self) -> Result<f32, FaultKind>;

    /// Carriage angular velocity in radians per second
    fn velocity(&mut self) -> Result<f32, FaultKind>;
}
