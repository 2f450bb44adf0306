//! Status light drivers

pub mod pulse;

pub use pulse::PulseIndicator;
