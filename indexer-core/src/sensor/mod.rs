//! Break-beam sensing
//!
//! The gate turns raw active-low beam reads into logical piece-present
//! flags, and groups them into a per-tick snapshot.

pub mod fault;
pub mod gate;

pub use fault::{FaultSource, SensorFault};
pub use gate::{SensorGate, SensorState};
