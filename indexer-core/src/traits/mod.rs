//! Hardware and collaborator port traits
//!
//! These traits define the interface between the coordination logic
//! and hardware-specific or subsystem-specific implementations.

pub mod drive;
pub mod feedback;
pub mod intake;
pub mod sensor;
pub mod telemetry;

pub use drive::Drive;
pub use feedback::{HapticChannel, HapticFeedback, NullIndicator, StatusIndicator};
pub use intake::IntakeLink;
pub use sensor::{AngleSensor, DigitalSensor, FaultKind};
pub use telemetry::{NullTelemetry, TelemetrySink};
