//! Carriage angle control
//!
//! A profiled PID controller over a continuous (wrapping) angle domain, with
//! an arm feedforward term holding the carriage against gravity.

pub mod angle;
pub mod feedforward;
pub mod pid;
pub mod position;
pub mod profile;

pub use angle::{input_modulus, within_tolerance, wrap_error};
pub use feedforward::ArmFeedforward;
pub use pid::Pid;
pub use position::PositionController;
pub use profile::{ProfileState, TrapezoidProfile};
